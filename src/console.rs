// Line commands standing in for clicks while the client runs headless.
// `toggle <room_id> <appliance_id>` clicks the appliance control on that room's page.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::actions::{ActionDispatcher, DispatchOutcome};
use crate::dom::{self, Selector, SharedDocument};

pub const USAGE: &str = "toggle <room_id> <appliance_id>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle {
        room_id: String,
        appliance_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, expected: toggle <room_id> <appliance_id>")]
    Unknown(String),
    #[error("usage: toggle <room_id> <appliance_id>")]
    Usage,
    #[error("no room page {0:?}")]
    UnknownRoom(String),
    #[error("room {room_id:?} has no appliance {appliance_id:?}")]
    UnknownAppliance {
        room_id: String,
        appliance_id: String,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => Err(CommandError::Empty),
            ["toggle", room_id, appliance_id] => Ok(Command::Toggle {
                room_id: room_id.to_string(),
                appliance_id: appliance_id.to_string(),
            }),
            ["toggle", ..] => Err(CommandError::Usage),
            [other, ..] => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

struct RoomControls {
    document: SharedDocument,
    dispatcher: ActionDispatcher,
}

/// Routes commands to the room pages registered with it.
#[derive(Default)]
pub struct Console {
    rooms: HashMap<String, RoomControls>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// `dispatcher` must act on `document`, the room page's own document.
    pub fn add_room(
        &mut self,
        room_id: impl Into<String>,
        document: SharedDocument,
        dispatcher: ActionDispatcher,
    ) {
        self.rooms.insert(
            room_id.into(),
            RoomControls {
                document,
                dispatcher,
            },
        );
    }

    pub async fn execute(&self, command: &Command) -> Result<DispatchOutcome, CommandError> {
        match command {
            Command::Toggle {
                room_id,
                appliance_id,
            } => {
                let room = self
                    .rooms
                    .get(room_id)
                    .ok_or_else(|| CommandError::UnknownRoom(room_id.clone()))?;
                let node = dom::lock(&room.document)
                    .query(&Selector::attr("data-id", appliance_id.as_str()))
                    .ok_or_else(|| CommandError::UnknownAppliance {
                        room_id: room_id.clone(),
                        appliance_id: appliance_id.clone(),
                    })?;
                Ok(room.dispatcher.dispatch(node).await)
            }
        }
    }

    /// Executes lines until the sender side closes. Failures are logged, never fatal.
    pub async fn run(&self, mut lines: mpsc::Receiver<String>) {
        while let Some(line) = lines.recv().await {
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "console command rejected");
                    continue;
                }
            };
            match self.execute(&command).await {
                Ok(outcome) => tracing::info!(?command, ?outcome, "console command done"),
                Err(e) => tracing::warn!(error = %e, ?command, "console command failed"),
            }
        }
        tracing::debug!("console input closed");
    }
}
