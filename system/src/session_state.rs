use std::collections::{HashMap, VecDeque};

use crate::message::*;

/// Oldest strokes are evicted once the history grows past this.
pub const HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub color: Color,
    pub position: Point,
}

/// The whole shared state of a whiteboard: committed strokes, strokes taken
/// back by undo, and who is connected.
///
/// Every method commits in one step. Callers must not interleave calls from
/// several threads; the server funnels them through a single task.
#[derive(Debug, Default)]
pub struct SessionState {
    history: VecDeque<Stroke>,
    undo_buffer: Vec<Stroke>,
    users: HashMap<ConnectionId, User>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user with a fresh color. An already registered id is
    /// overwritten.
    pub fn add_user(&mut self, id: ConnectionId) -> Color {
        let color = random_user_color();
        self.users.insert(
            id,
            User {
                color: color.clone(),
                position: Point::default(),
            },
        );
        color
    }

    pub fn remove_user(&mut self, id: &ConnectionId) {
        self.users.remove(id);
    }

    pub fn update_cursor(&mut self, id: &ConnectionId, x: f64, y: f64) -> Option<&User> {
        let user = self.users.get_mut(id)?;
        user.position = Point::new(x, y);
        Some(user)
    }

    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.history.push_back(stroke);
        self.undo_buffer.clear();
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }

    /// Takes back the most recent stroke, whoever drew it, and returns the
    /// resulting history. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Vec<Stroke>> {
        let stroke = self.history.pop_back()?;
        self.undo_buffer.push(stroke);
        Some(self.history())
    }

    pub fn history(&self) -> Vec<Stroke> {
        self.history.iter().cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn undo_buffer(&self) -> &[Stroke] {
        &self.undo_buffer
    }

    pub fn user(&self, id: &ConnectionId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

fn random_user_color() -> Color {
    format!("hsl({}, 70%, 50%)", rand::random_range(0..360u16))
}
