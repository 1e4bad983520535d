//! page/offsets — in-memory индекс seq_num → смещение записи.
//!
//! Элемент i хранит смещение записи с seq_num = min_seq_num + i.
//! Индекс только растёт; не персистится, перестраивается в open().

/// Упорядоченный список смещений записей страницы.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OffsetIndex {
    offsets: Vec<usize>,
}

impl OffsetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            offsets: Vec::with_capacity(n),
        }
    }

    /// Добавить смещение очередной записи (строго в порядке seq_num).
    #[inline]
    pub fn append(&mut self, offset: usize) {
        debug_assert!(self.offsets.last().map_or(true, |&last| last < offset));
        self.offsets.push(offset);
    }

    /// Смещение записи с относительным индексом `rel`; None вне [0, len).
    #[inline]
    pub fn lookup(&self, rel: usize) -> Option<usize> {
        self.offsets.get(rel).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Сброс после неудачного open().
    pub(crate) fn clear(&mut self) {
        self.offsets.clear();
    }
}
