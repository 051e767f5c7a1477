//! Picker presentation
//!
//! A thin layer between a text front-end and the resolver: it turns input
//! lines into [`Intent`]s and renders resolver snapshots into a status line.
//! It holds no selection state of its own.

use crate::coord::Coordinates;
use crate::map::HeadlessMap;
use crate::resolver::{Intent, ResolverSnapshot};
use std::str::FromStr;

/// A parsed line of picker input
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    /// Forward to the resolver
    Intent(Intent),
    /// Print the status line again
    Status,
    /// Block until every pending lookup has finished
    Wait,
    /// Commit the selection and exit
    Done,
    /// Exit without committing
    Quit,
    Help,
}

impl FromStr for ViewCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "click" => parse_click(rest).map(|coords| Self::Intent(Intent::MapClick(coords))),
            // Unlike the other commands, `type` keeps its argument verbatim so
            // trailing spaces reach the search box.
            "type" => {
                let raw = s.trim_start().trim_end_matches(['\r', '\n']);
                let text = raw
                    .get(word.len()..)
                    .map(|t| t.strip_prefix(' ').unwrap_or(t))
                    .unwrap_or_default();
                Ok(Self::Intent(Intent::SearchInput(text.to_string())))
            }
            "locate" | "here" => Ok(Self::Intent(Intent::Geolocate)),
            "clear" => Ok(Self::Intent(Intent::ClearSelection)),
            "dismiss" => Ok(Self::Intent(Intent::DismissNotice)),
            "status" | "" => Ok(Self::Status),
            "wait" => Ok(Self::Wait),
            "done" => Ok(Self::Done),
            "quit" | "exit" => Ok(Self::Quit),
            "help" | "?" => Ok(Self::Help),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

fn parse_click(args: &str) -> Result<Coordinates, String> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    let [lat, lng] = parts.as_slice() else {
        return Err("Usage: click <lat> <lng>".to_string());
    };
    let lat: f64 = lat
        .parse()
        .map_err(|_| format!("Invalid latitude: {}", lat))?;
    let lng: f64 = lng
        .parse()
        .map_err(|_| format!("Invalid longitude: {}", lng))?;

    let coords = Coordinates::new(lat, lng);
    coords.validate().map_err(|e| e.to_string())?;
    Ok(coords)
}

/// Renders resolver state for a terminal
#[derive(Debug, Default)]
pub struct LocationPickerView {
    last_rendered: Option<String>,
}

impl LocationPickerView {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-line summary of the picker
    pub fn render(&self, snapshot: &ResolverSnapshot, map: &HeadlessMap) -> String {
        let mut parts = Vec::new();

        match &snapshot.current {
            Some(location) => parts.push(format!("Selected: {}", location)),
            None => parts.push("Selected: none".to_string()),
        }

        if !snapshot.pending_search_text.is_empty() {
            let suffix = if snapshot.busy.searching { " (searching...)" } else { "" };
            parts.push(format!("Search: \"{}\"{}", snapshot.pending_search_text, suffix));
        } else if snapshot.busy.searching {
            parts.push("Searching...".to_string());
        }

        if snapshot.busy.locating {
            parts.push("Locating...".to_string());
        }

        if let Some(center) = map.center() {
            parts.push(format!("Map: {} @ z{}", center, map.zoom()));
        }

        let mut line = parts.join(" | ");
        if let Some(notice) = &snapshot.notice {
            line.push_str(&format!("\n! {} (type 'dismiss' to hide)", notice));
        }
        line
    }

    /// Render only when the output differs from the previous call
    pub fn render_if_changed(&mut self, snapshot: &ResolverSnapshot, map: &HeadlessMap) -> Option<String> {
        let line = self.render(snapshot, map);
        if self.last_rendered.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last_rendered = Some(line.clone());
        Some(line)
    }

    /// Forget the previous render so the next one is always printed
    pub fn invalidate(&mut self) {
        self.last_rendered = None;
    }

    pub fn help() -> &'static str {
        "Commands:\n  \
         click <lat> <lng>  select a point on the map\n  \
         type <text>        set the search box (looked up after a pause)\n  \
         locate             use the current device position\n  \
         clear              drop the selection\n  \
         dismiss            hide the current notice\n  \
         status             show the picker state\n  \
         wait               finish pending lookups\n  \
         done               confirm the selection\n  \
         quit               leave without selecting"
    }
}
