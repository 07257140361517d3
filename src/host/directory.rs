//! Game menu

use super::{GameDirectory, GameEntry, GameId};

/// Registered games in registration order
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Vec<GameEntry>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[GameEntry] {
        &self.entries
    }

    pub fn get(&self, id: GameId) -> Option<&GameEntry> {
        self.entries.get(usize::from(id.0))
    }
}

impl GameDirectory for Directory {
    fn register(&mut self, entry: GameEntry) -> GameId {
        let id = GameId(u8::try_from(self.entries.len()).unwrap_or(u8::MAX));
        log::info!("Registered game {} as {:?}", entry.name, id);
        self.entries.push(entry);
        id
    }
}
