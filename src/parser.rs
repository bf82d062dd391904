//! Decklist text parsing
//!
//! Accepts the usual export formats: `4 Lightning Bolt`, `4x Lightning Bolt`,
//! Arena style `1 Sol Ring (C21) 263`, `SB:` prefixes and section headers
//! (`Deck`, `Sideboard`, ...). Lines that cannot be read are skipped; missing
//! cards are reported later by the resolver, not here.

use crate::card::{CardEntry, Classification, Printing, MAX_COPIES};

/// One readable decklist line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckLine {
    pub count: u32,
    pub name: String,
    pub printing: Option<Printing>,
}

/// Parser result: entries in line order plus the positions of commander entries
#[derive(Debug, Default)]
pub struct ParsedDeck {
    pub entries: Vec<CardEntry>,
    pub commander_indices: Vec<usize>,
}

impl ParsedDeck {
    pub fn has_commander(&self) -> bool {
        !self.commander_indices.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Main,
    Sideboard,
    Maybeboard,
}

fn is_comment(line: &str) -> bool {
    line.starts_with("//") || line.starts_with('#')
}

fn section_header(line: &str) -> Option<Section> {
    let header = line.trim_end_matches(':').trim().to_lowercase();
    match header.as_str() {
        "deck" | "main" | "mainboard" | "commander" | "companion" => Some(Section::Main),
        "sideboard" => Some(Section::Sideboard),
        "maybeboard" => Some(Section::Maybeboard),
        _ => None,
    }
}

/// Split the leading quantity off a line. Missing, non-numeric or
/// non-positive quantities count as one; large ones are capped at
/// [`MAX_COPIES`].
fn split_quantity(line: &str) -> (u32, &str) {
    let Some((head, rest)) = line.split_once(char::is_whitespace) else {
        // a lone quantity has no name
        if line.trim_end_matches(['x', 'X']).parse::<i64>().is_ok() {
            return (1, "");
        }
        return (1, line);
    };
    let digits = head.trim_end_matches(['x', 'X']);
    match digits.parse::<i64>() {
        Ok(n) if n > i64::from(MAX_COPIES) => {
            log::warn!("Quantity {} capped at {}", n, MAX_COPIES);
            (MAX_COPIES, rest.trim())
        }
        Ok(n) if n > 0 => (n as u32, rest.trim()),
        Ok(_) => (1, rest.trim()),
        // too many digits for i64
        Err(_) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            log::warn!("Quantity {} capped at {}", digits, MAX_COPIES);
            (MAX_COPIES, rest.trim())
        }
        Err(_) => (1, line),
    }
}

/// Strip a trailing `(SET) 123` printing designator and export markers like `*F*`.
fn split_printing(name: &str) -> (String, Option<Printing>) {
    let mut trimmed = name.trim();
    while let Some(stripped) = ["*F*", "*E*", "*A*"]
        .iter()
        .find_map(|marker| trimmed.strip_suffix(marker))
    {
        trimmed = stripped.trim_end();
    }

    if let Some(open) = trimmed.rfind(" (") {
        let rest = &trimmed[open + 2..];
        if let Some((set, after)) = rest.split_once(')') {
            let set = set.trim();
            let collector_number = after.trim();
            let set_ok = !set.is_empty() && set.chars().all(|c| c.is_ascii_alphanumeric());
            if set_ok && !collector_number.contains(char::is_whitespace) {
                let printing = (!collector_number.is_empty()).then(|| Printing {
                    set: set.to_string(),
                    collector_number: collector_number.to_string(),
                });
                return (trimmed[..open].trim().to_string(), printing);
            }
        }
    }

    (trimmed.to_string(), None)
}

/// Parse a single card line; `None` for blank lines, comments and lines
/// without a name.
pub fn parse_line(line: &str) -> Option<DeckLine> {
    let line = line.trim();
    if line.is_empty() || is_comment(line) {
        return None;
    }

    let (count, rest) = split_quantity(line);
    let (name, printing) = split_printing(rest);
    if name.is_empty() {
        return None;
    }

    Some(DeckLine {
        count,
        name,
        printing,
    })
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Commander names from the commander and partner fields.
///
/// Each field may hold several lines; quantities are stripped the same way
/// as for decklist lines.
pub fn commander_names(commander: &str, partner: &str) -> Vec<String> {
    commander
        .lines()
        .chain(partner.lines())
        .filter_map(parse_line)
        .map(|line| line.name)
        .collect()
}

/// Turn decklist lines into card entries.
///
/// Lines matching one of `commanders` are classified as commanders. When
/// commanders were given but none of them is in the list, an entry is
/// appended for each so the commander always ends up in the output.
pub fn parse_decklist<S: AsRef<str>>(lines: &[S], commanders: &[String]) -> ParsedDeck {
    let wanted: Vec<String> = commanders.iter().map(|c| normalize(c)).collect();
    let mut deck = ParsedDeck::default();
    let mut section = Section::Main;

    for raw in lines {
        let raw = raw.as_ref().trim();
        if raw.is_empty() || is_comment(raw) {
            continue;
        }
        if let Some(next) = section_header(raw) {
            section = next;
            continue;
        }
        if section == Section::Maybeboard {
            continue;
        }

        let (sideboard, body) = match raw.strip_prefix("SB:") {
            Some(rest) => (true, rest),
            None => (section == Section::Sideboard, raw),
        };
        let Some(line) = parse_line(body) else {
            log::debug!("Skipping unreadable decklist line: {}", raw);
            continue;
        };

        let classification = if sideboard {
            Classification::Sideboard
        } else if wanted.contains(&normalize(&line.name)) {
            deck.commander_indices.push(deck.entries.len());
            Classification::Commander
        } else {
            Classification::Default
        };

        let entry =
            CardEntry::named(line.name, line.count, classification).with_printing(line.printing);
        deck.entries.push(entry);
    }

    if !commanders.is_empty() && deck.commander_indices.is_empty() {
        for name in commanders {
            log::info!("Commander {} not in decklist, adding it", name);
            deck.commander_indices.push(deck.entries.len());
            deck.entries
                .push(CardEntry::named(name.trim(), 1, Classification::Commander));
        }
    }

    log::info!(
        "Parsed {} decklist entries ({} commander)",
        deck.entries.len(),
        deck.commander_indices.len()
    );

    deck
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
