//! Mapping from physical keys to logical game actions.
//!
//! [`KeyBindings`] is the user-editable table (`--keys <file.json>`), keyed by key names
//! such as `"Left"`, `"Space"` or `"z"`. [`KeyLatch`] turns the terminal's key events into
//! the press/release transitions the engine expects, synthesizing releases on terminals
//! that never report them.

use std::collections::{BTreeMap, HashMap};

use blockfall_engine::{Action, InputEvent};
use crossterm::event::{KeyCode, KeyEventKind};
use serde::{Deserialize, Serialize};

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Space", KeyCode::Char(' ')),
    ("Enter", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Backspace", KeyCode::Backspace),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Insert", KeyCode::Insert),
    ("Delete", KeyCode::Delete),
];

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown key name: {_0:?}")]
pub struct UnknownKeyError(#[error(not(source))] String);

/// Letters match regardless of case, so Shift or Caps Lock do not break bindings.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        code => code,
    }
}

/// Parses a key name: one of the named keys (case-insensitive), `F1`-`F12`, or a single
/// printable character.
pub fn parse_key_name(name: &str) -> Option<KeyCode> {
    if let Some((_, code)) = NAMED_KEYS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
    {
        return Some(*code);
    }
    if let Some(n) = name
        .strip_prefix(['F', 'f'])
        .and_then(|n| n.parse::<u8>().ok())
        && (1..=12).contains(&n)
    {
        return Some(KeyCode::F(n));
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() && !c.is_control() => {
            Some(normalize(KeyCode::Char(c)))
        }
        _ => None,
    }
}

pub fn key_name(code: KeyCode) -> Option<String> {
    let code = normalize(code);
    if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, key)| *key == code) {
        return Some((*name).to_owned());
    }
    match code {
        KeyCode::F(n) => Some(format!("F{n}")),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

/// Key-to-action table, stored on disk as a JSON object of `"key name": "Action"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Action>",
    into = "BTreeMap<String, Action>"
)]
pub struct KeyBindings {
    keys: HashMap<KeyCode, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = [
            (KeyCode::Left, Action::MoveLeft),
            (KeyCode::Right, Action::MoveRight),
            (KeyCode::Down, Action::SoftDrop),
            (KeyCode::Up, Action::Rotate),
            (KeyCode::Char('x'), Action::Rotate),
            (KeyCode::Char('z'), Action::RotateCounterClockwise),
            (KeyCode::Char(' '), Action::HardDrop),
            (KeyCode::Char('c'), Action::Hold),
            (KeyCode::Char('p'), Action::Pause),
            (KeyCode::Esc, Action::Escape),
            (KeyCode::Char('q'), Action::Escape),
        ];
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, Action>> for KeyBindings {
    type Error = UnknownKeyError;

    fn try_from(map: BTreeMap<String, Action>) -> Result<Self, Self::Error> {
        let keys = map
            .into_iter()
            .map(|(name, action)| match parse_key_name(&name) {
                Some(code) => Ok((code, action)),
                None => Err(UnknownKeyError(name)),
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { keys })
    }
}

impl From<KeyBindings> for BTreeMap<String, Action> {
    fn from(bindings: KeyBindings) -> Self {
        bindings
            .keys
            .into_iter()
            .filter_map(|(code, action)| Some((key_name(code)?, action)))
            .collect()
    }
}

impl KeyBindings {
    pub fn action(&self, code: KeyCode) -> Option<Action> {
        self.keys.get(&normalize(code)).copied()
    }

    /// Names of the keys bound to `action`, sorted.
    pub fn keys_for(&self, action: Action) -> Vec<String> {
        let mut names = self
            .keys
            .iter()
            .filter(|&(_, bound)| *bound == action)
            .filter_map(|(code, _)| key_name(*code))
            .collect::<Vec<_>>();
        names.sort();
        names
    }
}

/// Converts key events into engine input events.
///
/// When the terminal reports releases, presses and releases of held actions are forwarded
/// as they come and auto-repeat events are dropped. Otherwise the terminal only sends
/// repeated presses while a key is down, so a held action counts as released once no press
/// has been seen for `release_timeout_ms`.
#[derive(Debug, Clone)]
pub struct KeyLatch {
    release_events: bool,
    release_timeout_ms: u64,
    held: HashMap<Action, u64>,
}

impl KeyLatch {
    pub const DEFAULT_RELEASE_TIMEOUT_MS: u64 = 150;

    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            release_timeout_ms: Self::DEFAULT_RELEASE_TIMEOUT_MS,
            held: HashMap::new(),
        }
    }

    pub fn set_release_events(&mut self, release_events: bool) {
        self.release_events = release_events;
    }

    pub fn key_event(
        &mut self,
        action: Action,
        kind: KeyEventKind,
        now_ms: u64,
        out: &mut Vec<InputEvent>,
    ) {
        match kind {
            KeyEventKind::Press if action.is_held() => {
                if self.held.insert(action, now_ms).is_none() {
                    out.push(InputEvent::pressed(action));
                }
            }
            KeyEventKind::Press => out.push(InputEvent::pressed(action)),
            KeyEventKind::Repeat => {}
            KeyEventKind::Release => {
                if self.held.remove(&action).is_some() {
                    out.push(InputEvent::released(action));
                }
            }
        }
    }

    /// Emits synthetic releases for held actions whose key went quiet.
    pub fn expire(&mut self, now_ms: u64, out: &mut Vec<InputEvent>) {
        if self.release_events {
            return;
        }
        for action in Action::ALL {
            if let Some(&last_seen) = self.held.get(&action)
                && now_ms.saturating_sub(last_seen) > self.release_timeout_ms
            {
                self.held.remove(&action);
                out.push(InputEvent::released(action));
            }
        }
    }
}
