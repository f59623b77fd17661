use num::traits::AsPrimitive;
use rayon::prelude::*;

use crate::index::matrix::{CountCell, FrequencyMatrix};

/// TF-IDF weighted matrix
/// Same shape as the frequency matrix it was derived from.
/// Never mutated in place: every structural change of the source produces a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TFIDFMatrix {
    weights: Vec<Vec<f64>>,
    unit_count: usize,
}

impl TFIDFMatrix {
    #[inline]
    pub fn row(&self, idx: usize) -> Option<&[f64]> {
        self.weights.get(idx).map(|r| r.as_slice())
    }

    #[inline]
    pub fn get(&self, row: usize, unit: usize) -> Option<f64> {
        self.weights.get(row).and_then(|r| r.get(unit)).copied()
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }
}

/// Strategy that turns raw counts into TF-IDF weights.
///
/// Two granularities exist and they deliberately differ:
/// - `PageTFIDFEngine`: `count * ln(P / df)`, no length normalization
/// - `CollectionTFIDFEngine`: `(count / column_sum) * ln(D / df)`
pub trait TFIDFEngine {
    fn weigh<N: CountCell>(matrix: &FrequencyMatrix<N>) -> TFIDFMatrix;
}

/// Pages inside one document.
/// Raw counts are not divided by page length; short pages would be favoured otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageTFIDFEngine;

/// Documents inside a collection, term frequency normalized by document length.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionTFIDFEngine;

/// `ln(units / df)`, zero for a row that never occurs
#[inline]
pub fn idf(unit_count: usize, doc_freq: usize) -> f64 {
    if doc_freq == 0 {
        return 0.0;
    }
    (unit_count as f64 / doc_freq as f64).ln()
}

impl TFIDFEngine for PageTFIDFEngine {
    fn weigh<N: CountCell>(matrix: &FrequencyMatrix<N>) -> TFIDFMatrix {
        let unit_count = matrix.unit_count();
        let doc_freqs = matrix.doc_freqs();
        let weights = matrix
            .rows()
            .par_iter()
            .zip(doc_freqs.par_iter())
            .map(|(row, &df)| {
                let idf = idf(unit_count, df);
                row.iter().map(|&c| AsPrimitive::<f64>::as_(c) * idf).collect::<Vec<f64>>()
            })
            .collect();
        TFIDFMatrix { weights, unit_count }
    }
}

impl TFIDFEngine for CollectionTFIDFEngine {
    fn weigh<N: CountCell>(matrix: &FrequencyMatrix<N>) -> TFIDFMatrix {
        let unit_count = matrix.unit_count();
        let doc_freqs = matrix.doc_freqs();
        let column_sums = matrix.column_sums();
        let weights = matrix
            .rows()
            .par_iter()
            .zip(doc_freqs.par_iter())
            .map(|(row, &df)| {
                let idf = idf(unit_count, df);
                row.iter()
                    .zip(&column_sums)
                    .map(|(&c, &sum)| {
                        // empty unit: every weight is 0
                        if sum == 0.0 {
                            0.0
                        } else {
                            (AsPrimitive::<f64>::as_(c) / sum) * idf
                        }
                    })
                    .collect::<Vec<f64>>()
            })
            .collect();
        TFIDFMatrix { weights, unit_count }
    }
}
