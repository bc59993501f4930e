use blockfall_engine::Action;
use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::keys::KeyBindings;

/// Keys bound to an action, and what the action does.
#[derive(Debug, Clone)]
pub struct KeyHint {
    keys: Vec<String>,
    description: &'static str,
}

impl KeyHint {
    /// Hints for `actions`, skipping actions without a bound key.
    pub fn for_actions(bindings: &KeyBindings, actions: &[(Action, &'static str)]) -> Vec<Self> {
        actions
            .iter()
            .map(|&(action, description)| KeyHint {
                keys: bindings.keys_for(action),
                description,
            })
            .filter(|hint| !hint.keys.is_empty())
            .collect()
    }
}

#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    hints: &'a [KeyHint],
    block: Option<BlockWidget<'a>>,
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(hints: &'a [KeyHint]) -> Self {
        Self { hints, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const KEY_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const ITEM_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let mut spans = vec![];

        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", ITEM_SEPARATOR_STYLE));
            }
            for (i, key) in hint.keys.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled("/", KEY_SEPARATOR_STYLE));
                }
                spans.push(Span::styled(key.as_str(), KEY_STYLE));
            }
            spans.push(Span::from(" "));
            spans.push(Span::styled(hint.description, DESCRIPTION_STYLE));
        }

        Line::from(spans).centered().render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_skip_unbound_actions() {
        let bindings: KeyBindings =
            serde_json::from_str(r#"{"Left": "MoveLeft", "a": "MoveLeft"}"#).unwrap();
        let hints = KeyHint::for_actions(
            &bindings,
            &[(Action::MoveLeft, "Left"), (Action::Hold, "Hold")],
        );
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].keys, ["Left", "a"]);
        assert_eq!(hints[0].description, "Left");
    }
}
