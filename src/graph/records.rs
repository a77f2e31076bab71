//! Node, edge and obstacle records: line parsing, graph loading and export
//!
//! Records are comma separated:
//!
//! ```text
//! # id,x,y,base_cost
//! 1,0.0,0.0,0
//! # id1,id2,weight
//! 1,2,1.5
//! # x,y,diameter
//! 0.25,0.1,0.2
//! ```
//!
//! Lines whose first character is `#` and blank lines are ignored. Loading is
//! best effort: bad lines and edges to unknown nodes are skipped and collected
//! into a [`LoadReport`] while the rest of the graph is built.

use log::{info, warn};

use crate::common::{Obstacle, PlanningError, PlanningResult, Point2D};
use crate::graph::model::Graph;

/// Node input record
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub base_cost: f64,
}

/// Undirected edge input record
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub id1: String,
    pub id2: String,
    pub weight: f64,
}

/// Obstacle input record
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleRecord {
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
}

impl From<ObstacleRecord> for Obstacle {
    fn from(r: ObstacleRecord) -> Self {
        Obstacle::new(r.x, r.y, r.diameter)
    }
}

impl From<&Obstacle> for ObstacleRecord {
    fn from(o: &Obstacle) -> Self {
        Self {
            x: o.center.x,
            y: o.center.y,
            diameter: o.diameter,
        }
    }
}

/// Issues met while loading; every entry was skipped
#[derive(Debug, Default)]
pub struct LoadReport {
    pub issues: Vec<PlanningError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, err: PlanningError) {
        warn!("skipping record: {}", err);
        self.issues.push(err);
    }
}

fn is_ignored(line: &str) -> bool {
    line.starts_with('#') || line.trim().is_empty()
}

fn split_fields<'a>(line: &'a str, expected: usize) -> PlanningResult<Vec<&'a str>> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(malformed(
            line,
            format!("expected {} fields, found {}", expected, fields.len()),
        ));
    }
    Ok(fields)
}

fn parse_number(line: &str, name: &str, field: &str) -> PlanningResult<f64> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(malformed(line, format!("{} '{}' is not a finite number", name, field))),
    }
}

fn malformed(line: &str, reason: String) -> PlanningError {
    PlanningError::MalformedRecord {
        line: line.trim_end().to_string(),
        reason,
    }
}

/// Parse one node line, `Ok(None)` for comments and blank lines
pub fn parse_node_line(line: &str) -> PlanningResult<Option<NodeRecord>> {
    if is_ignored(line) {
        return Ok(None);
    }
    let f = split_fields(line, 4)?;
    if f[0].is_empty() {
        return Err(malformed(line, "empty node id".to_string()));
    }
    Ok(Some(NodeRecord {
        id: f[0].to_string(),
        x: parse_number(line, "x", f[1])?,
        y: parse_number(line, "y", f[2])?,
        base_cost: parse_number(line, "cost", f[3])?,
    }))
}

/// Parse one edge line, `Ok(None)` for comments and blank lines
pub fn parse_edge_line(line: &str) -> PlanningResult<Option<EdgeRecord>> {
    if is_ignored(line) {
        return Ok(None);
    }
    let f = split_fields(line, 3)?;
    let weight = parse_number(line, "weight", f[2])?;
    if weight < 0.0 {
        return Err(malformed(line, format!("negative weight {}", weight)));
    }
    Ok(Some(EdgeRecord {
        id1: f[0].to_string(),
        id2: f[1].to_string(),
        weight,
    }))
}

/// Parse one obstacle line, `Ok(None)` for comments and blank lines
pub fn parse_obstacle_line(line: &str) -> PlanningResult<Option<ObstacleRecord>> {
    if is_ignored(line) {
        return Ok(None);
    }
    let f = split_fields(line, 3)?;
    let diameter = parse_number(line, "diameter", f[2])?;
    if diameter < 0.0 {
        return Err(malformed(line, format!("negative diameter {}", diameter)));
    }
    Ok(Some(ObstacleRecord {
        x: parse_number(line, "x", f[0])?,
        y: parse_number(line, "y", f[1])?,
        diameter,
    }))
}

fn parse_lines<T>(
    text: &str,
    parse: fn(&str) -> PlanningResult<Option<T>>,
    report: &mut LoadReport,
) -> Vec<T> {
    text.lines()
        .filter_map(|line| match parse(line) {
            Ok(record) => record,
            Err(e) => {
                report.push(e);
                None
            }
        })
        .collect()
}

/// Parse node lines, collecting bad lines into `report`
pub fn parse_nodes(text: &str, report: &mut LoadReport) -> Vec<NodeRecord> {
    parse_lines(text, parse_node_line, report)
}

/// Parse edge lines, collecting bad lines into `report`
pub fn parse_edges(text: &str, report: &mut LoadReport) -> Vec<EdgeRecord> {
    parse_lines(text, parse_edge_line, report)
}

/// Parse obstacle lines, collecting bad lines into `report`
pub fn parse_obstacles(text: &str, report: &mut LoadReport) -> Vec<ObstacleRecord> {
    parse_lines(text, parse_obstacle_line, report)
}

pub fn format_node(r: &NodeRecord) -> String {
    format!("{},{},{},{}", r.id, r.x, r.y, r.base_cost)
}

pub fn format_edge(r: &EdgeRecord) -> String {
    format!("{},{},{}", r.id1, r.id2, r.weight)
}

pub fn format_obstacle(r: &ObstacleRecord) -> String {
    format!("{},{},{}", r.x, r.y, r.diameter)
}

/// Join formatted records into file contents, one record per line
pub fn to_lines<T>(records: &[T], format: fn(&T) -> String) -> String {
    records.iter().map(|r| format(r) + "\n").collect()
}

impl Graph {
    /// Build a graph from parsed records.
    ///
    /// Duplicate node ids and edges naming unknown nodes are skipped and
    /// reported; everything else is loaded.
    pub fn from_records(
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
        obstacles: &[ObstacleRecord],
    ) -> (Graph, LoadReport) {
        let mut graph = Graph::new();
        let mut report = LoadReport::default();

        for r in nodes {
            if let Err(e) = graph.add_node(&r.id, Point2D::new(r.x, r.y), r.base_cost) {
                report.push(e);
            }
        }
        for r in edges {
            if let Err(e) = graph.add_edge_by_id(&r.id1, &r.id2, r.weight) {
                report.push(e);
            }
        }
        for r in obstacles {
            graph.add_obstacle(r.clone().into());
        }

        match graph.edge_cost_stats() {
            Some(stats) => info!(
                "loaded {} nodes, {} edges, {} obstacles; edge costs min:{:.3} max:{:.3} avg:{:.3}",
                graph.node_count(),
                graph.edge_count(),
                graph.obstacles().len(),
                stats.min,
                stats.max,
                stats.mean
            ),
            None => info!(
                "loaded {} nodes, no edges, {} obstacles",
                graph.node_count(),
                graph.obstacles().len()
            ),
        }

        (graph, report)
    }

    /// Parse record text and build a graph; parse and load issues share one report
    pub fn from_text(nodes: &str, edges: &str, obstacles: Option<&str>) -> (Graph, LoadReport) {
        let mut report = LoadReport::default();
        let node_records = parse_nodes(nodes, &mut report);
        let edge_records = parse_edges(edges, &mut report);
        let obstacle_records = obstacles
            .map(|text| parse_obstacles(text, &mut report))
            .unwrap_or_default();

        let (graph, load_report) = Graph::from_records(&node_records, &edge_records, &obstacle_records);
        report.issues.extend(load_report.issues);
        (graph, report)
    }

    pub fn node_records(&self) -> Vec<NodeRecord> {
        self.nodes()
            .iter()
            .map(|n| NodeRecord {
                id: n.id.clone(),
                x: n.position.x,
                y: n.position.y,
                base_cost: n.base_cost,
            })
            .collect()
    }

    /// Each undirected edge once, in insertion order
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        self.edges()
            .map(|(a, b, weight)| EdgeRecord {
                id1: self.nodes()[a].id.clone(),
                id2: self.nodes()[b].id.clone(),
                weight,
            })
            .collect()
    }

    pub fn obstacle_records(&self) -> Vec<ObstacleRecord> {
        self.obstacles().iter().map(ObstacleRecord::from).collect()
    }
}
