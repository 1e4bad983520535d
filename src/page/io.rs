//! page/io — общий контракт страницы очереди (PageIo) и абстракция элемента.
//!
//! PageIo реализуют и in-memory страница (memory.rs), и дисковые варианты;
//! хуки жизненного цикла (activate/deactivate/ensure_persisted/purge)
//! по умолчанию ничего не делают.

use anyhow::Result;

/// Элемент очереди: сериализуемый payload + номер последовательности.
pub trait Queueable {
    fn seq_num(&self) -> u64;
    fn serialize(&self) -> Result<Vec<u8>>;
}

/// Одна прочитанная запись страницы.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadElement {
    pub seq_num: u64,
    pub payload: Vec<u8>,
}

impl ReadElement {
    pub fn new(seq_num: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            seq_num,
            payload: payload.into(),
        }
    }
}

/// Контракт страницы, которым пользуется очередь.
///
/// До create()/open() допустимы только аксессоры; остальные операции
/// возвращают PageError::NotActive.
pub trait PageIo {
    /// Переоткрыть существующую страницу: проверить заголовок и реплеить
    /// `element_count` записей, начиная с `min_seq_num`.
    fn open(&mut self, min_seq_num: u64, element_count: usize) -> Result<()>;

    /// Инициализировать новую страницу (заголовок, пустой индекс).
    fn create(&mut self) -> Result<()>;

    /// Поместится ли ещё запись с payload длины `byte_size`.
    fn has_space(&self, byte_size: usize) -> bool;

    /// Дописать запись в конец страницы.
    fn write(&mut self, payload: &[u8], seq_num: u64) -> Result<()>;

    /// Прочитать до `limit` записей, начиная с `seq_num`.
    fn read(&mut self, seq_num: u64, limit: usize) -> Result<Vec<ReadElement>>;

    fn capacity(&self) -> usize;
    fn write_position(&self) -> usize;
    fn element_count(&self) -> usize;
    fn min_seq_num(&self) -> u64;

    /// Дописать элемент очереди (сериализация + его seq_num).
    fn write_element(&mut self, element: &dyn Queueable) -> Result<()> {
        let bytes = element.serialize()?;
        self.write(&bytes, element.seq_num())
    }

    fn activate(&mut self) -> Result<()> {
        Ok(())
    }

    fn deactivate(&mut self) -> Result<()> {
        Ok(())
    }

    fn ensure_persisted(&mut self) -> Result<()> {
        Ok(())
    }

    fn purge(&mut self) -> Result<()> {
        Ok(())
    }
}
