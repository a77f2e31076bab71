//! Visualization utilities for roadmap_planner
//!
//! Draws a graph, its obstacles and a found path with gnuplot. Plot calls
//! only record layers; the figure is assembled into a single set of axes
//! when it is shown or saved.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{Obstacle, PlanningError, PlanningResult, Point2D};
use crate::graph::Graph;
use crate::path_planning::GraphPath;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#808080";
    pub const LIGHT_GRAY: &str = "#C8C8C8";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const EDGE: &str = LIGHT_GRAY;
    pub const NODE: &str = GRAY;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
}

/// Segments used to draw an obstacle outline
const CIRCLE_SEGMENTS: usize = 48;

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}

#[derive(Debug, Clone)]
enum Layer {
    Lines {
        x: Vec<f64>,
        y: Vec<f64>,
        style: PathStyle,
    },
    Points {
        x: Vec<f64>,
        y: Vec<f64>,
        style: PointStyle,
    },
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    layers: Vec<Layer>,
    title: String,
    x_label: String,
    y_label: String,
}

impl Visualizer {
    /// Create a new visualizer
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            layers: Vec::new(),
            title: String::new(),
            x_label: "X [m]".to_string(),
            y_label: "Y [m]".to_string(),
        }
    }

    /// Set the plot title
    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn push_lines(&mut self, points: &[Point2D], style: PathStyle) {
        self.layers.push(Layer::Lines {
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            style,
        });
    }

    /// Plot obstacles as circle outlines
    pub fn plot_obstacles(&mut self, obstacles: &[Obstacle]) -> &mut Self {
        for (i, o) in obstacles.iter().enumerate() {
            let outline: Vec<Point2D> = (0..=CIRCLE_SEGMENTS)
                .map(|k| {
                    let a = 2.0 * std::f64::consts::PI * k as f64 / CIRCLE_SEGMENTS as f64;
                    Point2D::new(o.center.x + o.radius() * a.cos(), o.center.y + o.radius() * a.sin())
                })
                .collect();
            let caption = if i == 0 { "Obstacles" } else { "" };
            self.push_lines(&outline, PathStyle::new(colors::OBSTACLE, caption).with_line_width(1.5));
        }
        self
    }

    /// Plot every edge of the graph
    pub fn plot_edges(&mut self, graph: &Graph) -> &mut Self {
        for (i, (a, b, _)) in graph.edges().enumerate() {
            let caption = if i == 0 { "Edges" } else { "" };
            let segment = [graph.nodes()[a].position, graph.nodes()[b].position];
            self.push_lines(&segment, PathStyle::new(colors::EDGE, caption).with_line_width(1.0));
        }
        self
    }

    /// Plot every node of the graph
    pub fn plot_nodes(&mut self, graph: &Graph) -> &mut Self {
        let points: Vec<Point2D> = graph.nodes().iter().map(|n| n.position).collect();
        self.plot_points(&points, &PointStyle::new(colors::NODE, "Nodes").with_size(0.8))
    }

    /// Plot a path through the graph
    pub fn plot_path(&mut self, graph: &Graph, path: &GraphPath, style: &PathStyle) -> &mut Self {
        let points = path.positions(graph);
        if !points.is_empty() {
            self.push_lines(&points, style.clone());
        }
        self
    }

    /// Plot multiple points
    pub fn plot_points(&mut self, points: &[Point2D], style: &PointStyle) -> &mut Self {
        self.layers.push(Layer::Points {
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            style: style.clone(),
        });
        self
    }

    /// Plot start position
    pub fn plot_start(&mut self, point: Point2D) -> &mut Self {
        self.plot_points(&[point], &PointStyle::new(colors::START, "Start").with_size(1.5))
    }

    /// Plot goal position
    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.plot_points(&[point], &PointStyle::new(colors::GOAL, "Goal").with_size(1.5))
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> PlanningResult<()> {
        self.render();
        self.figure
            .show()
            .map_err(|e| PlanningError::Visualization(e.to_string()))
            .map(|_| ())
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> PlanningResult<()> {
        self.render();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| PlanningError::Visualization(e.to_string()))
    }

    /// Save plot to SVG file
    pub fn save_svg(&mut self, path: &str) -> PlanningResult<()> {
        self.render();
        self.figure
            .save_to_svg(path, 800, 600)
            .map_err(|e| PlanningError::Visualization(e.to_string()))
    }

    fn render(&mut self) {
        self.figure = Figure::new();
        let axes = self.figure.axes2d();

        for layer in &self.layers {
            match layer {
                Layer::Lines { x, y, style } => {
                    axes.lines(
                        x,
                        y,
                        &[
                            Caption(style.caption.as_str()),
                            Color(style.color.as_str()),
                            LineWidth(style.line_width),
                        ],
                    );
                }
                Layer::Points { x, y, style } => {
                    axes.points(
                        x,
                        y,
                        &[
                            Caption(style.caption.as_str()),
                            Color(style.color.as_str()),
                            PointSymbol(style.symbol),
                            PointSize(style.size),
                        ],
                    );
                }
            }
        }

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Roadmap figure: obstacles, edges, nodes, and optionally a path with its endpoints
pub fn plot_roadmap(graph: &Graph, path: Option<&GraphPath>, title: &str) -> Visualizer {
    let mut vis = Visualizer::new();
    vis.set_title(title);
    vis.plot_obstacles(graph.obstacles())
        .plot_edges(graph)
        .plot_nodes(graph);

    if let Some(path) = path {
        vis.plot_path(graph, path, &PathStyle::default());
        let points = path.positions(graph);
        if let (Some(&start), Some(&goal)) = (points.first(), points.last()) {
            vis.plot_start(start).plot_goal(goal);
        }
    }

    vis
}
