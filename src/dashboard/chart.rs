//! Sales chart payload.
//!
//! The page draws the chart; the server decides what goes on it. The
//! historical series sits at indices `0..n`, the prediction at `n`, and
//! a dashed connector joins the last observation to the prediction.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: usize,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub historical_label: &'static str,
    pub predicted_label: &'static str,
    pub historical: Vec<ChartPoint>,
    pub predicted: ChartPoint,
    pub connector: [ChartPoint; 2],
}

impl SalesChart {
    pub fn new(history: &[f64], prediction: f64) -> Self {
        let historical: Vec<ChartPoint> = history
            .iter()
            .enumerate()
            .map(|(x, &y)| ChartPoint { x, y })
            .collect();
        let predicted = ChartPoint {
            x: history.len(),
            y: prediction,
        };
        let anchor = historical.last().copied().unwrap_or(predicted);

        Self {
            title: "Sales Prediction",
            x_label: "Days",
            y_label: "Sales",
            historical_label: "Historical Sales",
            predicted_label: "Predicted Sales",
            historical,
            predicted,
            connector: [anchor, predicted],
        }
    }
}
