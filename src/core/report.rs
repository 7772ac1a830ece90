use crate::utils::error::{BbrError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    #[default]
    Table,
    Tab,
    Ssv,
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Table,
        OutputFormat::Tab,
        OutputFormat::Ssv,
        OutputFormat::Csv,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Tab => "tab",
            OutputFormat::Ssv => "ssv",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OutputFormat::Table => "Table",
            OutputFormat::Tab => "Tab-separated",
            OutputFormat::Ssv => "Semicolon-separated",
            OutputFormat::Csv => "Comma-separated",
        }
    }

    /// "table, tab, ssv, csv"
    pub fn allowed_names() -> String {
        Self::ALL
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            OutputFormat::Table => Box::new(TableRenderer),
            OutputFormat::Tab => Box::new(DelimitedRenderer::new(b'\t')),
            OutputFormat::Ssv => Box::new(DelimitedRenderer::new(b';')),
            OutputFormat::Csv => Box::new(DelimitedRenderer::new(b',')),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = BbrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| BbrError::InvalidFormat {
                value: s.to_string(),
            })
    }
}

pub trait ReportRenderer {
    fn render(&self, headers: &[&str], rows: &[Vec<String>]) -> Result<String>;
}

/// Separator-delimited output. Fields are only quoted when they contain the
/// delimiter, a quote or a line break.
pub struct DelimitedRenderer {
    delimiter: u8,
}

impl DelimitedRenderer {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl ReportRenderer for DelimitedRenderer {
    fn render(&self, headers: &[&str], rows: &[Vec<String>]) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .flexible(true)
            .from_writer(Vec::new());

        writer.write_record(headers).map_err(render_error)?;
        for row in rows {
            writer.write_record(row).map_err(render_error)?;
        }

        let bytes = writer.into_inner().map_err(|e| BbrError::Render {
            message: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| BbrError::Render {
            message: e.to_string(),
        })
    }
}

fn render_error(e: csv::Error) -> BbrError {
    BbrError::Render {
        message: e.to_string(),
    }
}

/// Box-drawn table in the style of a console table helper:
///
/// ```text
/// +--------+-------+
/// | Header | Other |
/// +--------+-------+
/// | value  | 1     |
/// +--------+-------+
/// ```
pub struct TableRenderer;

impl ReportRenderer for TableRenderer {
    fn render(&self, headers: &[&str], rows: &[Vec<String>]) -> Result<String> {
        let columns = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0usize; columns];
        for (i, header) in headers.iter().enumerate() {
            widths[i] = widths[i].max(header.chars().count());
        }
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let separator = {
            let mut line = String::from("+");
            for width in &widths {
                line.push_str(&"-".repeat(width + 2));
                line.push('+');
            }
            line
        };

        let mut out = Vec::with_capacity(rows.len() + 4);
        out.push(separator.clone());
        out.push(format_line(&widths, headers.iter().copied()));
        out.push(separator.clone());
        for row in rows {
            out.push(format_line(&widths, row.iter().map(String::as_str)));
        }
        if !rows.is_empty() {
            out.push(separator);
        }

        let mut rendered = out.join("\n");
        rendered.push('\n');
        Ok(rendered)
    }
}

fn format_line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    let mut cells = cells.fuse();
    for width in widths {
        let cell = cells.next().unwrap_or("");
        let padding = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
        line.push('|');
    }
    line
}
