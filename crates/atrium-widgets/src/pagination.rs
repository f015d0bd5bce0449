//! Pagination control.
//!
//! A pure render of `(current_page, total_pages)`: previous, one button per
//! page, next. Pages are 1-based. Nothing is rendered for a single page.

/// One numbered page button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControl {
    pub page: u32,
    pub active: bool,
}

/// Previous/next button. `target` is `None` when the button is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControl {
    pub target: Option<u32>,
}

impl NavControl {
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.target.is_none()
    }
}

/// Which control was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Previous,
    Next,
    Page(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current_page: u32,
    pub total_pages: u32,
    pub previous: NavControl,
    pub pages: Vec<PageControl>,
    pub next: NavControl,
}

/// Render the control set, or `None` when there is nothing to paginate.
///
/// An out-of-range `current_page` is clamped into `1..=total_pages`.
#[must_use]
pub fn render(current_page: u32, total_pages: u32) -> Option<PaginationView> {
    if total_pages <= 1 {
        return None;
    }
    let current = current_page.clamp(1, total_pages);
    let pages = (1..=total_pages)
        .map(|page| PageControl {
            page,
            active: page == current,
        })
        .collect();
    Some(PaginationView {
        current_page: current,
        total_pages,
        previous: NavControl {
            target: (current > 1).then(|| current - 1),
        },
        pages,
        next: NavControl {
            target: (current < total_pages).then(|| current + 1),
        },
    })
}

impl PaginationView {
    /// Number of page controls marked active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.pages.iter().filter(|p| p.active).count()
    }

    /// Resolve a click to the page it navigates to, if any.
    #[must_use]
    pub fn target_of(&self, control: Control) -> Option<u32> {
        match control {
            Control::Previous => self.previous.target,
            Control::Next => self.next.target,
            Control::Page(page) => {
                (page >= 1 && page <= self.total_pages && page != self.current_page).then_some(page)
            }
        }
    }

    /// Handle a click, invoking `on_page_change` with the destination page.
    ///
    /// Disabled controls, the active page and out-of-range pages do nothing.
    /// Returns whether the callback ran.
    pub fn click<F>(&self, control: Control, on_page_change: F) -> bool
    where
        F: FnOnce(u32),
    {
        match self.target_of(control) {
            Some(page) => {
                on_page_change(page);
                true
            }
            None => false,
        }
    }
}
