//! Load sequencing.
//!
//! Reading a dropped file is asynchronous, so two loads can be in flight at
//! once. Each load takes a ticket when it starts; only the ticket of the most
//! recently started load may apply its result.

use serde::Serialize;

/// Proof that a load was started, carrying its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Issues load tickets and checks whether one is still current.
#[derive(Debug, Clone, Default)]
pub struct LoadGuard {
    generation: u64,
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load, superseding every earlier ticket.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Whether no newer load has started since `ticket` was issued.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Generation of the most recently started load.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
