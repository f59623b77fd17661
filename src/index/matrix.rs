use std::fmt::Debug;

use num::traits::AsPrimitive;
use num::{Num, NumCast, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::index::vocabulary::Vocabulary;

/// Cell type of a frequency matrix
/// Non-negative integer counts (u8 up to u64) that widen to `u64` and cast to `f64`.
pub trait CountCell: Num + Copy + PartialOrd + NumCast + AsPrimitive<f64> + Into<u64> + Send + Sync + Debug {}
impl<T> CountCell for T where T: Num + Copy + PartialOrd + NumCast + AsPrimitive<f64> + Into<u64> + Send + Sync + Debug {}

/// FrequencyMatrix
/// Growable table of raw counts.
/// Rows are vocabulary terms (row `i` is the term with vocabulary index `i`),
/// columns are indexing units (pages of a document, or documents of a collection).
///
/// Stored as one dynamically-sized vector per term row.
/// Every row always has exactly `unit_count` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyMatrix<N = u32> {
    rows: Vec<Vec<N>>,
    unit_count: usize,
}

impl<N> Default for FrequencyMatrix<N> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            unit_count: 0,
        }
    }
}

impl<N> FrequencyMatrix<N>
where
    N: CountCell,
{
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<N>] {
        &self.rows
    }

    #[inline]
    pub fn row(&self, idx: usize) -> Option<&[N]> {
        self.rows.get(idx).map(|r| r.as_slice())
    }

    #[inline]
    pub fn get(&self, row: usize, unit: usize) -> Option<N> {
        self.rows.get(row).and_then(|r| r.get(unit)).copied()
    }

    /// Append one unit (column) from validated counts.
    ///
    /// 1. every existing row gets a zero cell for the new unit
    /// 2. known terms set their cell in the new column
    /// 3. unseen terms are registered in `vocab` and get a new zero-filled row
    ///    whose last cell holds the count
    ///
    /// The shape is checked before anything is touched, so on error neither
    /// `vocab` nor the matrix has changed.
    pub fn grow<S>(&mut self, vocab: &mut Vocabulary, counts: &[(S, N)]) -> Result<()>
    where
        S: AsRef<str>,
    {
        self.check_shape(vocab.len(), self.unit_count)?;

        let new_col = self.unit_count;
        for row in self.rows.iter_mut() {
            row.push(N::zero());
        }
        self.unit_count += 1;

        for (term, count) in counts {
            let term = term.as_ref();
            match vocab.lookup(term) {
                Some(idx) => self.rows[idx][new_col] = *count,
                None => {
                    vocab.get_or_create_index(term);
                    let mut row = vec![N::zero(); self.unit_count];
                    row[new_col] = *count;
                    self.rows.push(row);
                }
            }
        }
        Ok(())
    }

    /// Verify the matrix is `vocab_len x unit_count` and rectangular.
    pub fn check_shape(&self, vocab_len: usize, unit_count: usize) -> Result<()> {
        if self.rows.len() != vocab_len {
            return Err(IndexError::ShapeMismatch(format!(
                "matrix has {} rows but vocabulary has {} terms",
                self.rows.len(),
                vocab_len
            )));
        }
        if self.unit_count != unit_count {
            return Err(IndexError::ShapeMismatch(format!(
                "matrix has {} units, expected {}",
                self.unit_count, unit_count
            )));
        }
        if let Some(idx) = self.rows.iter().position(|r| r.len() != self.unit_count) {
            return Err(IndexError::ShapeMismatch(format!(
                "row {} has {} cells, expected {}",
                idx,
                self.rows[idx].len(),
                self.unit_count
            )));
        }
        Ok(())
    }

    /// Number of units with a non-zero count, per row
    pub fn doc_freqs(&self) -> Vec<usize> {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|c| !c.is_zero()).count())
            .collect()
    }

    /// Sum of every row, in vocabulary order
    pub fn row_sums(&self) -> Vec<u64> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|&c| Into::<u64>::into(c)).sum())
            .collect()
    }

    /// Sum of every column (total occurrences per unit)
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.unit_count];
        for row in &self.rows {
            for (sum, &c) in sums.iter_mut().zip(row) {
                *sum += AsPrimitive::<f64>::as_(c);
            }
        }
        sums
    }

    /// Raw counts of one unit as `f64`, one entry per vocabulary term
    pub fn column(&self, unit: usize) -> Option<Vec<f64>> {
        if unit >= self.unit_count {
            return None;
        }
        Some(self.rows.iter().map(|row| AsPrimitive::<f64>::as_(row[unit])).collect())
    }
}

/// Check and convert raw bag-of-words counts into matrix cells.
///
/// Every count is converted up front so a rejected input never reaches `grow`.
pub fn validate_counts<'a, N, C>(pairs: impl IntoIterator<Item = (&'a str, C)>) -> Result<Vec<(&'a str, N)>>
where
    N: CountCell,
    C: ToPrimitive + PartialOrd + Zero + Copy,
{
    pairs
        .into_iter()
        .map(|(term, count)| {
            if count < C::zero() {
                return Err(IndexError::NegativeCount { term: term.to_string() });
            }
            let cell = <N as NumCast>::from(count)
                .ok_or_else(|| IndexError::CountOverflow { term: term.to_string() })?;
            Ok((term, cell))
        })
        .collect()
}
