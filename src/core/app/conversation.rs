use tracing::debug;

use super::{App, Focus};

impl App {
    /// Index of the current conversation in the history list.
    pub fn current_conversation_index(&self) -> usize {
        let current = &self.service.current_conversation().id;
        self.service
            .conversation_history()
            .iter()
            .position(|c| &c.id == current)
            .unwrap_or(0)
    }

    pub fn create_conversation(&mut self) {
        self.service.create_new_conversation();
        self.sidebar_selected = 0;
        self.focus = Focus::Input;
        self.sync_messages();
    }

    /// Make the conversation at `index` in the history current.
    pub fn select_conversation(&mut self, index: usize) {
        let Some(id) = self
            .service
            .conversation_history()
            .get(index)
            .map(|c| c.id.clone())
        else {
            return;
        };
        if self.service.select_conversation(&id) {
            self.sidebar_selected = index;
            self.sync_messages();
        }
    }

    pub fn delete_conversation(&mut self, index: usize) {
        let Some(id) = self
            .service
            .conversation_history()
            .get(index)
            .map(|c| c.id.clone())
        else {
            return;
        };
        if self.service.delete_conversation(&id) {
            debug!(id = %id, "conversation removed from sidebar");
            self.clamp_sidebar_selection();
            self.sync_messages();
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
        if !self.sidebar_open && self.focus == Focus::Sidebar {
            self.focus = Focus::Input;
        }
    }

    /// Switch focus between the input and the sidebar, opening the sidebar
    /// when needed.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Input,
            Focus::Input => {
                self.sidebar_open = true;
                self.sidebar_selected = self.current_conversation_index();
                Focus::Sidebar
            }
        };
    }

    pub fn move_sidebar_selection(&mut self, delta: isize) {
        let len = self.service.conversation_history().len();
        if len == 0 {
            return;
        }
        self.sidebar_selected = self
            .sidebar_selected
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    pub(crate) fn clamp_sidebar_selection(&mut self) {
        let len = self.service.conversation_history().len();
        self.sidebar_selected = self.sidebar_selected.min(len.saturating_sub(1));
    }
}
