//! User intents parsed from terminal lines
//!
//! Item numbers are 1-based as shown in the list.

use duet_core::FocusChange;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Print the displayed list
    List,
    /// Print the current playback state
    Status,
    /// Select and play the item with this 1-based number
    Play(usize),
    TogglePlayPause,
    /// Seek to a percentage of the item (0-100)
    Seek(f64),
    Restart,
    Next,
    Previous,
    ToggleLoop,
    Shuffle,
    /// Simulate another application changing playback focus
    Focus(FocusChange),
    ListPlaylists,
    CreatePlaylist(String),
    DeletePlaylist(String),
    OpenPlaylist(String),
    /// Add a displayed item to the named playlist
    AddToPlaylist { item: usize, playlist: String },
    /// Remove a displayed item from the open playlist
    RemoveFromPlaylist(usize),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("Unknown command \"{0}\" (type help)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("\"{0}\" is not an item number")]
    BadNumber(String),
}

pub const HELP: &str = "\
Commands:
  list | ls                 show the list
  status | s                show what is playing
  play <n>                  play item n
  toggle | p                pause or resume
  seek <percent>            jump to a point in the item (0-100)
  restart | replay          play the item again from the start
  next | n, prev            step through the list
  loop                      repeat the current item
  shuffle                   play a random item
  focus <loss|transient|duck|gain>
                            pretend another app took or returned the output
  playlists                 list playlists (music)
  playlist new <name>       create a playlist and open it
  playlist delete <name>    delete a playlist
  playlist open <name>      show a playlist
  add <n> <playlist>        add item n to a playlist
  remove <n>                remove item n from the open playlist
  help | ?                  this text
  quit | q                  leave";

impl FromStr for Intent {
    type Err = IntentError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let intent = match command.to_lowercase().as_str() {
            "list" | "ls" => Intent::List,
            "status" | "s" => Intent::Status,
            "play" => Intent::Play(item_number(rest, "play <n>")?),
            "toggle" | "p" | "pause" | "resume" => Intent::TogglePlayPause,
            "seek" => Intent::Seek(percent(rest)?),
            "restart" | "replay" => Intent::Restart,
            "next" | "n" => Intent::Next,
            "prev" | "previous" => Intent::Previous,
            "loop" => Intent::ToggleLoop,
            "shuffle" => Intent::Shuffle,
            "focus" => Intent::Focus(focus_change(rest)?),
            "playlists" => Intent::ListPlaylists,
            "playlist" => playlist(rest)?,
            "add" => {
                const USAGE: &str = "add <n> <playlist>";
                let (number, name) = rest.split_once(char::is_whitespace).ok_or(IntentError::Usage(USAGE))?;
                Intent::AddToPlaylist {
                    item: item_number(number, USAGE)?,
                    playlist: name.trim().to_string(),
                }
            }
            "remove" | "rm" => Intent::RemoveFromPlaylist(item_number(rest, "remove <n>")?),
            "help" | "?" => Intent::Help,
            "quit" | "q" | "exit" => Intent::Quit,
            _ => return Err(IntentError::Unknown(command.to_string())),
        };
        Ok(intent)
    }
}

fn item_number(text: &str, usage: &'static str) -> Result<usize, IntentError> {
    if text.is_empty() {
        return Err(IntentError::Usage(usage));
    }
    match text.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(IntentError::BadNumber(text.to_string())),
    }
}

fn percent(text: &str) -> Result<f64, IntentError> {
    const USAGE: &str = "seek <percent>";
    let text = text.trim_end_matches('%');
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(IntentError::Usage(USAGE))
}

fn focus_change(text: &str) -> Result<FocusChange, IntentError> {
    match text.to_lowercase().as_str() {
        "loss" => Ok(FocusChange::Loss),
        "transient" => Ok(FocusChange::LossTransient),
        "duck" => Ok(FocusChange::LossTransientCanDuck),
        "gain" => Ok(FocusChange::Gain),
        _ => Err(IntentError::Usage("focus <loss|transient|duck|gain>")),
    }
}

fn playlist(rest: &str) -> Result<Intent, IntentError> {
    const USAGE: &str = "playlist <new|delete|open> <name>";
    let (action, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    // Blank names go through so the store can reject them
    let name = name.trim().to_string();
    match action.to_lowercase().as_str() {
        "new" | "create" => Ok(Intent::CreatePlaylist(name)),
        "delete" | "del" => Ok(Intent::DeletePlaylist(name)),
        "open" | "select" => Ok(Intent::OpenPlaylist(name)),
        _ => Err(IntentError::Usage(USAGE)),
    }
}
