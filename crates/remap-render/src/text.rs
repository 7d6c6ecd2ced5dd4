//! Inline colour codes for outline-font text.
//!
//! A string such as `"[:red]Hull [:0,255,0]100%"` is split into runs at
//! every `[:spec]` directive. `spec` is either a colour name, resolved
//! through a [`ColorResolver`], or a literal `R,G,B` triple. Text before the
//! first directive is white.

use remap_core::Color;

/// Turns colour names into colours.
pub trait ColorResolver {
    fn color_from_name(&self, name: &str) -> Color;
}

impl<F> ColorResolver for F
where
    F: Fn(&str) -> Color,
{
    fn color_from_name(&self, name: &str) -> Color {
        self(name)
    }
}

/// A small built-in palette. Unknown names resolve to white.
#[derive(Copy, Clone, Debug, Default)]
pub struct NamedColors;

impl ColorResolver for NamedColors {
    fn color_from_name(&self, name: &str) -> Color {
        match name.to_ascii_lowercase().as_str() {
            "white" => Color::WHITE,
            "black" => Color::BLACK,
            "red" => Color::from_rgb(255, 0, 0),
            "green" => Color::from_rgb(0, 255, 0),
            "blue" => Color::from_rgb(0, 0, 255),
            "yellow" => Color::from_rgb(255, 255, 0),
            "cyan" => Color::from_rgb(0, 255, 255),
            "magenta" => Color::from_rgb(255, 0, 255),
            "orange" => Color::from_rgb(255, 165, 0),
            "gray" | "grey" => Color::from_rgb(128, 128, 128),
            _ => {
                log::debug!("unknown colour name {name:?}, using white");
                Color::WHITE
            }
        }
    }
}

/// A piece of text drawn in one colour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorRun<'a> {
    pub text: &'a str,
    pub color: Color,
}

/// A run positioned on the line, `x_offset` in device-independent pixels
/// from the start of the string.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColoredTextPart<'a> {
    pub text: &'a str,
    pub color: Color,
    pub x_offset: f64,
}

/// Split `text` at its colour directives.
///
/// Runs that are empty or only whitespace are dropped; the directive before
/// them still takes effect for nothing. Kept runs are verbatim, including
/// surrounding spaces. Anything that looks like `[:` but is not a complete
/// directive stays in the text.
pub fn parse_color_codes<'a>(text: &'a str, resolver: &dyn ColorResolver) -> Vec<ColorRun<'a>> {
    let mut runs = Vec::new();
    let mut color = Color::WHITE;
    let mut run_start = 0;
    let mut search = 0;

    while let Some(found) = text[search..].find("[:") {
        let open = search + found;
        let spec_start = open + 2;
        let spec_len = text[spec_start..]
            .find(|c: char| !is_spec_char(c))
            .unwrap_or(text.len() - spec_start);
        let spec_end = spec_start + spec_len;

        if spec_len > 0 && text[spec_end..].starts_with(']') {
            push_run(&mut runs, &text[run_start..open], color);
            color = resolve_spec(&text[spec_start..spec_end], resolver);
            run_start = spec_end + 1;
            search = run_start;
        } else {
            search = open + 1;
        }
    }
    push_run(&mut runs, &text[run_start..], color);
    runs
}

/// Place runs left to right.
///
/// Each run starts after the measured width of every previous run plus one
/// `space_advance` of padding per previous run.
pub fn layout_color_runs<'a>(
    runs: &[ColorRun<'a>],
    mut measure: impl FnMut(&str) -> f64,
    space_advance: f64,
) -> Vec<ColoredTextPart<'a>> {
    let mut x_offset = 0.0;
    runs.iter()
        .map(|run| {
            let part = ColoredTextPart {
                text: run.text,
                color: run.color,
                x_offset,
            };
            x_offset += measure(run.text) + space_advance;
            part
        })
        .collect()
}

fn push_run<'a>(runs: &mut Vec<ColorRun<'a>>, text: &'a str, color: Color) {
    if !text.trim().is_empty() {
        runs.push(ColorRun { text, color });
    }
}

#[inline]
fn is_spec_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ','
}

/// `"R,G,B"` or a colour name.
fn resolve_spec(spec: &str, resolver: &dyn ColorResolver) -> Color {
    if !spec.contains(',') {
        return resolver.color_from_name(spec);
    }
    let mut channels = spec.split(',').map(|v| {
        v.trim()
            .parse::<i64>()
            .map(|n| n.clamp(0, 255) as u8)
            .unwrap_or(0)
    });
    let r = channels.next().unwrap_or(0);
    let g = channels.next().unwrap_or(0);
    let b = channels.next().unwrap_or(0);
    Color::from_rgb(r, g, b)
}
