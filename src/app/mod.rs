//! Application state types and entry glue.
//!
//! Holds the UI-side state for each resource tab (search query, page, cursor),
//! the modal stack, and helpers that derive the visible rows from the stores.
//! The event loop lives in [`update`] and is re-exported as `run`.
//!
pub mod keymap;
pub mod panel;
pub mod theme;
pub mod update;

use std::time::Instant;

use crate::context::AppContext;
use crate::paginate::Paginator;
use crate::search::ListFilter;
use keymap::Keymap;
use panel::{Panel, Row, panel_for};
use theme::Theme;

/// Top-level tab, one per resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActiveTab {
    Admins,
    DepartmentAdmins,
    Departments,
    Roles,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 4] = [
        ActiveTab::Admins,
        ActiveTab::DepartmentAdmins,
        ActiveTab::Departments,
        ActiveTab::Roles,
    ];

    pub fn index(self) -> usize {
        match self {
            ActiveTab::Admins => 0,
            ActiveTab::DepartmentAdmins => 1,
            ActiveTab::Departments => 2,
            ActiveTab::Roles => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActiveTab::Admins => "Admins",
            ActiveTab::DepartmentAdmins => "Department Admins",
            ActiveTab::Departments => "Departments",
            ActiveTab::Roles => "Roles",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Clone, Debug)]
pub enum ModalState {
    Details {
        title: String,
        lines: Vec<(&'static str, String)>,
    },
    /// `selected == schema.len()` means the Submit entry.
    Form {
        mode: FormMode,
        selected: usize,
        message: Option<String>,
    },
    DeleteConfirm {
        id: String,
        label: String,
        selected: usize,
    },
    Info {
        message: String,
    },
    Help {
        scroll: u16,
    },
}

/// Per-tab list state: query, page and the cursor within the page.
#[derive(Clone, Debug)]
pub struct ListView {
    pub filter: ListFilter,
    pub pager: Paginator,
    pub cursor: usize,
}

impl ListView {
    pub fn new(fields: &[&'static str], page_size: usize) -> Self {
        Self { filter: ListFilter::new(fields), pager: Paginator::new(page_size), cursor: 0 }
    }

    /// Keep page and cursor inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        self.pager.clamp(len);
        let on_page = len.saturating_sub(self.pager.offset()).min(self.pager.page_size());
        self.cursor = self.cursor.min(on_page.saturating_sub(1));
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub ctx: AppContext,
    pub active_tab: ActiveTab,
    pub views: [ListView; 4],
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    /// Outcome of the last write, shown in the status bar.
    pub status: Option<String>,
}

impl AppState {
    pub fn new(ctx: AppContext, page_size: usize, theme: Theme, keymap: Keymap) -> Self {
        let views = ActiveTab::ALL.map(|tab| ListView::new(panel_for(&ctx, tab).search_fields(), page_size));
        Self {
            started_at: Instant::now(),
            ctx,
            active_tab: ActiveTab::Admins,
            views,
            input_mode: InputMode::Normal,
            theme,
            keymap,
            modal: None,
            status: None,
        }
    }

    pub fn panel(&self) -> &dyn Panel {
        panel_for(&self.ctx, self.active_tab)
    }

    pub fn view(&self) -> &ListView {
        &self.views[self.active_tab.index()]
    }

    pub fn view_mut(&mut self) -> &mut ListView {
        &mut self.views[self.active_tab.index()]
    }

    /// Active tab's records after search.
    pub fn filtered_rows(&self) -> Vec<Row> {
        self.panel().filtered_rows(&self.view().filter)
    }

    /// Rows on the current page plus the total page count.
    pub fn visible_rows(&self) -> (Vec<Row>, usize) {
        let rows = self.filtered_rows();
        let view = self.view();
        let total = view.pager.total_pages(rows.len());
        (view.pager.page_items(&rows).to_vec(), total)
    }

    pub fn selected_row(&self) -> Option<Row> {
        let (rows, _) = self.visible_rows();
        rows.get(self.view().cursor).cloned()
    }

    /// Re-clamp the active view after its collection or query changed.
    pub fn sync_view(&mut self) {
        let len = self.filtered_rows().len();
        self.view_mut().clamp(len);
    }

    pub fn sync_all_views(&mut self) {
        for tab in ActiveTab::ALL {
            let len = panel_for(&self.ctx, tab).filtered_rows(&self.views[tab.index()].filter).len();
            self.views[tab.index()].clamp(len);
        }
    }

    pub fn move_up(&mut self) {
        let view = self.view_mut();
        view.cursor = view.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let (rows, _) = self.visible_rows();
        let view = self.view_mut();
        if view.cursor + 1 < rows.len() {
            view.cursor += 1;
        }
    }

    pub fn next_page(&mut self) {
        let len = self.filtered_rows().len();
        let view = self.view_mut();
        let before = view.pager.page();
        view.pager.next_page(len);
        if view.pager.page() != before {
            view.cursor = 0;
        }
    }

    pub fn prev_page(&mut self) {
        let view = self.view_mut();
        let before = view.pager.page();
        view.pager.prev_page();
        if view.pager.page() != before {
            view.cursor = 0;
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
