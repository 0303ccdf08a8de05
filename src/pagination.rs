use serde::Serialize;

/// Allowed page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PageSize {
    #[default]
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Twenty, PageSize::Fifty, PageSize::Hundred];

    pub fn get(self) -> usize {
        match self {
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    pub fn from_value(value: usize) -> Option<PageSize> {
        PageSize::ALL.into_iter().find(|size| size.get() == value)
    }
}

/// Signal that the grid should scroll back to the top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReset;

/// Current page over an ordered row sequence
///
/// Every operation returns a new state; out-of-range moves are clamped
/// rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page_index: usize,
    page_size: PageSize,
    total_rows: usize,
}

impl Pagination {
    pub fn new(total_rows: usize, page_size: PageSize) -> Self {
        Pagination {
            page_index: 0,
            page_size,
            total_rows,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// At least one page, even for an empty table
    pub fn page_count(&self) -> usize {
        self.total_rows.div_ceil(self.page_size.get()).max(1)
    }

    pub fn is_first(&self) -> bool {
        self.page_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.page_index + 1 >= self.page_count()
    }

    pub fn first(self) -> Self {
        Pagination {
            page_index: 0,
            ..self
        }
    }

    pub fn prev(self) -> Self {
        if self.is_first() {
            return self;
        }
        Pagination {
            page_index: self.page_index - 1,
            ..self
        }
    }

    pub fn next(self) -> Self {
        if self.is_last() {
            return self;
        }
        Pagination {
            page_index: self.page_index + 1,
            ..self
        }
    }

    pub fn last(self) -> Self {
        Pagination {
            page_index: self.page_count() - 1,
            ..self
        }
    }

    /// Jump to a page, clamped into `[0, page_count - 1]`
    pub fn goto(self, page_index: i64) -> Self {
        let last = (self.page_count() - 1) as i64;
        Pagination {
            page_index: page_index.clamp(0, last) as usize,
            ..self
        }
    }

    /// Change the page size, keeping the page index in range
    pub fn set_page_size(self, page_size: PageSize) -> (Self, ScrollReset) {
        let resized = Pagination { page_size, ..self };
        (resized.goto(self.page_index as i64), ScrollReset)
    }

    /// Rows of the current page
    pub fn page_slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = (self.page_index * self.page_size.get()).min(rows.len());
        let end = (start + self.page_size.get()).min(rows.len());
        &rows[start..end]
    }

    /// 1-based number of the first row on the page, 0 when empty
    pub fn first_row_number(&self) -> usize {
        if self.total_rows == 0 {
            0
        } else {
            self.page_index * self.page_size.get() + 1
        }
    }

    pub fn last_row_number(&self) -> usize {
        ((self.page_index + 1) * self.page_size.get()).min(self.total_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_is_at_least_one() {
        for size in PageSize::ALL {
            assert_eq!(Pagination::new(0, size).page_count(), 1);
        }
        assert_eq!(Pagination::new(20, PageSize::Twenty).page_count(), 1);
        assert_eq!(Pagination::new(21, PageSize::Twenty).page_count(), 2);
        assert_eq!(Pagination::new(101, PageSize::Hundred).page_count(), 2);
    }

    #[test]
    fn prev_and_next_stop_at_bounds() {
        let p = Pagination::new(45, PageSize::Twenty);
        assert_eq!(p.prev(), p);
        let last = p.next().next();
        assert_eq!(last.page_index(), 2);
        assert_eq!(last.next(), last);
        assert_eq!(last.first().page_index(), 0);
        assert_eq!(p.last().page_index(), 2);
    }

    #[test]
    fn goto_clamps() {
        let p = Pagination::new(45, PageSize::Twenty);
        assert_eq!(p.goto(-5).page_index(), 0);
        assert_eq!(p.goto(1).page_index(), 1);
        assert_eq!(p.goto(i64::MAX).page_index(), 2);
    }

    #[test]
    fn page_size_change_clamps_and_signals_scroll() {
        let p = Pagination::new(120, PageSize::Twenty).goto(5);
        let (resized, signal) = p.set_page_size(PageSize::Hundred);
        assert_eq!(resized.page_index(), 1);
        assert_eq!(resized.page_count(), 2);
        assert_eq!(signal, ScrollReset);
    }

    #[test]
    fn slices_current_page() {
        let rows: Vec<u32> = (0..45).collect();
        let p = Pagination::new(rows.len(), PageSize::Twenty).last();
        assert_eq!(p.page_slice(&rows), &rows[40..45]);
        assert_eq!(p.first_row_number(), 41);
        assert_eq!(p.last_row_number(), 45);
        assert!(Pagination::new(0, PageSize::Twenty).page_slice::<u32>(&[]).is_empty());
    }
}
