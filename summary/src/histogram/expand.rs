use super::accumulator::Histogram;
use crate::report::HistogramReport;

/// One histogram bin with its left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelledBin {
    pub lower_edge: f64,
    pub upper_edge: f64,
    pub count: u64,
}

/// Expands the non-empty bins of a histogram in ascending order.
pub fn expand_histogram(histo: &Histogram) -> Vec<LabelledBin> {
    let layout = histo.layout();
    histo
        .bins()
        .filter(|(_, count)| *count > 0)
        .map(|(index, count)| LabelledBin {
            lower_edge: layout.lower_edge(index),
            upper_edge: layout.upper_edge(index),
            count,
        })
        .collect()
}

pub fn histogram_report(histo: &Histogram) -> HistogramReport {
    let bins = expand_histogram(histo);
    HistogramReport {
        bin_size: histo.bin_size(),
        bin_names: bins.iter().map(|bin| format!("{}", bin.lower_edge)).collect(),
        bins: bins.iter().map(|bin| bin.count).collect(),
    }
}
