use serde::Serialize;
use serde_json::{json, Value};

use crate::constants::{CHART_HEIGHT_PX, HEADROOM_FACTOR};
use crate::trajectory_system::trajectory::Trajectory;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub mode: String,
    pub color: String,
    pub width: u32,
    pub marker_size: Option<u32>,
    pub show_legend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    pub range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMetadata {
    pub planet: String,
    pub drop_height: f64,
    pub gravity: f64,
    pub samples: usize,
}

/// Everything a plotting library needs to draw one drop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub series: Vec<Series>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub height: u32,
    pub template: String,
    pub metadata: ChartMetadata,
}

pub fn prepare(trajectory: &Trajectory, planet: &str, height: f64, gravity: f64) -> ChartSpec {
    let (start, end) = trajectory.time_range();
    let y_max = trajectory.max_height().max(0.0) * HEADROOM_FACTOR;

    let ball = Series {
        name: "Ball Height".to_string(),
        x: trajectory.times(),
        y: trajectory.heights(),
        mode: "lines+markers".to_string(),
        color: "blue".to_string(),
        width: 2,
        marker_size: Some(2),
        show_legend: true,
    };
    let ground = Series {
        name: "Ground".to_string(),
        x: vec![start, end],
        y: vec![0.0, 0.0],
        mode: "lines".to_string(),
        color: "brown".to_string(),
        width: 3,
        marker_size: None,
        show_legend: false,
    };

    ChartSpec {
        title: format!(
            "Ball Trajectory on {} (Drop Height: {:?}m, g={:?}m/s²)",
            planet, height, gravity
        ),
        series: vec![ball, ground],
        x_axis: Axis {
            title: "Time (s)".to_string(),
            range: (start, end),
        },
        y_axis: Axis {
            title: "Height (m)".to_string(),
            range: (0.0, y_max),
        },
        height: CHART_HEIGHT_PX,
        template: "plotly_white".to_string(),
        metadata: ChartMetadata {
            planet: planet.to_string(),
            drop_height: height,
            gravity,
            samples: trajectory.len(),
        },
    }
}

impl ChartSpec {
    /// Plotly figure JSON (`data` traces plus `layout`).
    pub fn to_plotly(&self) -> Value {
        let traces: Vec<Value> = self
            .series
            .iter()
            .map(|series| {
                let mut trace = json!({
                    "type": "scatter",
                    "name": series.name,
                    "x": series.x,
                    "y": series.y,
                    "mode": series.mode,
                    "line": { "color": series.color, "width": series.width },
                    "showlegend": series.show_legend,
                });
                if let Some(size) = series.marker_size {
                    trace["marker"] = json!({ "size": size });
                }
                trace
            })
            .collect();

        json!({
            "data": traces,
            "layout": {
                "title": { "text": self.title },
                "xaxis": { "title": { "text": self.x_axis.title }, "range": [self.x_axis.range.0, self.x_axis.range.1] },
                "yaxis": { "title": { "text": self.y_axis.title }, "range": [self.y_axis.range.0, self.y_axis.range.1] },
                "template": self.template,
                "showlegend": true,
                "height": self.height,
                "meta": self.metadata,
            }
        })
    }
}
