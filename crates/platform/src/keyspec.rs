//! Key spec parsing
//!
//! A spec is one chord of `+`-separated tokens: `pagedown`, `ctrl+\`,
//! `ctrl+shift+t`. Use `plus` for a literal `+` key.

use command::KeyError;

/// Modifier keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    /// Windows key / Command key
    Meta,
}

/// Non-modifier keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Tab,
    Escape,
    Space,
    Backspace,
    Delete,
    Insert,
    /// F1..=F24
    Function(u8),
    /// Printable ASCII character
    Char(char),
}

/// Modifiers held while one key is pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub modifiers: Vec<Modifier>,
    pub key: Key,
}

impl Chord {
    /// Parse a chord spec
    pub fn parse(spec: &str) -> Result<Self, KeyError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(KeyError::UnknownKey(String::new()));
        }

        let tokens: Vec<&str> = spec
            .split('+')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        let Some((last, held)) = tokens.split_last() else {
            return Err(KeyError::UnknownKey(spec.to_string()));
        };

        let modifiers = held
            .iter()
            .map(|t| parse_modifier(t).ok_or_else(|| KeyError::UnknownKey(t.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let key = parse_key(last).ok_or_else(|| KeyError::UnknownKey(last.to_string()))?;
        Ok(Self { modifiers, key })
    }

    /// Emit one press: modifiers down, key down, key up, modifiers up in reverse.
    ///
    /// Everything that went down is released even when an event fails, so a
    /// failed injection never leaves a modifier held. The first error wins.
    pub fn press<F>(&self, mut emit: F) -> Result<(), KeyError>
    where
        F: FnMut(KeyEvent) -> Result<(), KeyError>,
    {
        let strokes: Vec<Stroke> = self
            .modifiers
            .iter()
            .map(|m| Stroke::Modifier(*m))
            .chain(std::iter::once(Stroke::Key(self.key)))
            .collect();

        let mut down = 0;
        let mut result = Ok(());
        for &stroke in &strokes {
            if let Err(e) = emit(KeyEvent::Down(stroke)) {
                result = Err(e);
                break;
            }
            down += 1;
        }

        for &stroke in strokes[..down].iter().rev() {
            if let Err(e) = emit(KeyEvent::Up(stroke)) {
                result = result.and(Err(e));
            }
        }
        result
    }
}

/// One physical key in a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Modifier(Modifier),
    Key(Key),
}

/// Key transition emitted by [`Chord::press`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(Stroke),
    Up(Stroke),
}

fn parse_modifier(token: &str) -> Option<Modifier> {
    let t = token.to_ascii_lowercase();
    match t.as_str() {
        "ctrl" | "control" => Some(Modifier::Ctrl),
        "shift" => Some(Modifier::Shift),
        "alt" | "option" => Some(Modifier::Alt),
        "win" | "windows" | "meta" | "cmd" | "command" => Some(Modifier::Meta),
        _ => None,
    }
}

fn parse_key(token: &str) -> Option<Key> {
    let t = token.to_ascii_lowercase();
    let key = match t.as_str() {
        "pageup" | "pgup" => Key::PageUp,
        "pagedown" | "pgdn" => Key::PageDown,
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "home" => Key::Home,
        "end" => Key::End,
        "enter" | "return" => Key::Enter,
        "tab" => Key::Tab,
        "esc" | "escape" => Key::Escape,
        "space" => Key::Space,
        "backspace" | "bksp" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "insert" | "ins" => Key::Insert,
        "plus" => Key::Char('+'),
        _ => return parse_function(&t).or_else(|| parse_char(token)),
    };
    Some(key)
}

fn parse_function(t: &str) -> Option<Key> {
    let n: u8 = t.strip_prefix('f')?.parse().ok()?;
    (1..=24).contains(&n).then_some(Key::Function(n))
}

fn parse_char(token: &str) -> Option<Key> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_graphic() => Some(Key::Char(ch.to_ascii_lowercase())),
        _ => None,
    }
}
