// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CSV discovery and decoding, plus construction of venues and guests from
//! human-edited spreadsheets. Schema problems become warnings; only files
//! that cannot be read at all are errors.

use crate::error::PlannerError;
use crate::fx::{self, Currency, RateSnapshot, RateTable};
use crate::models::{Guest, GuestList, Venue};
use crate::pricing::{self, PriceInput};
use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const VENUE_SUFFIX: &str = "_csv.csv";
pub const GUEST_FILE: &str = "guest_list.csv";

/// Filename token → country label. First substring match wins.
const COUNTRY_TOKENS: &[(&str, &str)] = &[
    ("englandscotland", "England"),
    ("englandmore", "England"),
    ("england", "England"),
    ("scotland", "Scotland"),
    ("wales", "Wales"),
    ("france", "France"),
    ("italy", "Italy"),
    ("spain", "Spain"),
    ("portugal", "Portugal"),
    ("ireland", "Ireland"),
    ("unitedstates", "United States"),
    ("usa", "United States"),
];

/// Countries a `Region/Country` cell may name to refine the file label.
const ROW_COUNTRIES: &[&str] = &["Scotland", "England", "Wales", "France", "Italy", "Spain", "Portugal", "Ireland"];

const COUNTRY_CURRENCY: &[(&str, Currency)] = &[
    ("England", Currency::Gbp),
    ("Scotland", Currency::Gbp),
    ("Wales", Currency::Gbp),
    ("France", Currency::Eur),
    ("Italy", Currency::Eur),
    ("Spain", Currency::Eur),
    ("Portugal", Currency::Eur),
    ("Ireland", Currency::Eur),
    ("United States", Currency::Usd),
];

const GUEST_ATTRIBUTES: &[&str] = &[
    "name", "category", "source", "total events", "table", "notes", "email", "phone", "address",
];

const CP1252_UNASSIGNED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Cp1252,
}

impl TextEncoding {
    pub const ORDER: [TextEncoding; 3] = [TextEncoding::Utf8, TextEncoding::Latin1, TextEncoding::Cp1252];

    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "Latin-1",
            TextEncoding::Cp1252 => "CP1252",
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_string)
            }
            // C1 controls in a spreadsheet export mean CP1252 punctuation.
            TextEncoding::Latin1 => {
                if bytes.iter().any(|b| (0x80..=0x9F).contains(b)) {
                    None
                } else {
                    Some(bytes.iter().map(|&b| b as char).collect())
                }
            }
            // WHATWG maps the five unassigned bytes to C1 controls; treat them as errors.
            TextEncoding::Cp1252 => {
                if bytes.iter().any(|b| CP1252_UNASSIGNED.contains(b)) {
                    return None;
                }
                encoding_rs::WINDOWS_1252
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|s| s.into_owned())
            }
        }
    }

    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Some(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
            TextEncoding::Cp1252 => {
                let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
                (!had_errors).then(|| bytes.into_owned())
            }
        }
    }
}

/// A CSV file held as strings, remembering how it was encoded on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub encoding: TextEncoding,
}

impl RawTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        let want = normalize_header(name);
        self.headers.iter().position(|h| normalize_header(h) == want)
    }

    /// First header whose normalised form satisfies `pred`.
    pub fn find_column<F: Fn(&str) -> bool>(&self, pred: F) -> Option<usize> {
        self.headers.iter().position(|h| pred(&normalize_header(h)))
    }

    pub fn cell(&self, row: usize, col: Option<usize>) -> Option<&str> {
        let v = self.rows.get(row)?.get(col?)?.trim();
        (!v.is_empty()).then_some(v)
    }

    /// Returns the column index, appending an empty column when absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(i) = self.column(name) {
            return i;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    pub fn set(&mut self, row: usize, col: usize, value: String) {
        if let Some(r) = self.rows.get_mut(row) {
            if r.len() <= col {
                r.resize(col + 1, String::new());
            }
            r[col] = value;
        }
    }
}

pub fn normalize_header(h: &str) -> String {
    h.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn read_text(path: &Path) -> Result<(String, TextEncoding)> {
    let bytes = fs::read(path).map_err(|e| PlannerError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    for enc in TextEncoding::ORDER {
        if let Some(text) = enc.decode(&bytes) {
            tracing::debug!(path = %path.display(), encoding = enc.name(), "decoded");
            return Ok((text, enc));
        }
        tracing::debug!(path = %path.display(), encoding = enc.name(), "decode failed, trying next");
    }
    Err(PlannerError::Undecodable {
        path: path.to_path_buf(),
    }
    .into())
}

pub fn read_table(path: &Path) -> Result<RawTable> {
    let (text, encoding) = read_text(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Read CSV header of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec.with_context(|| format!("Read CSV row of {}", path.display()))?;
        let mut row: Vec<String> = rec.iter().map(str::to_string).collect();
        row.resize(headers.len().max(row.len()), String::new());
        rows.push(row);
    }
    Ok(RawTable {
        headers,
        rows,
        encoding,
    })
}

/// Rewrite a table in place using the encoding it was read with.
pub fn write_table(path: &Path, table: &RawTable) -> Result<()> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    let buf = wtr
        .into_inner()
        .map_err(|e| anyhow!("Flush CSV buffer: {}", e.error()))?;
    let text = String::from_utf8(buf).context("CSV writer produced invalid UTF-8")?;
    let bytes = table
        .encoding
        .encode(&text)
        .ok_or_else(|| PlannerError::Unencodable {
            path: path.to_path_buf(),
            encoding: table.encoding.name(),
        })?;
    fs::write(path, bytes).with_context(|| format!("Write {}", path.display()))?;
    Ok(())
}

/// `france_csv.csv` → `france`; other names → their stem.
pub fn file_token(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match name.strip_suffix(VENUE_SUFFIX) {
        Some(token) => token.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or(name),
    }
}

pub fn classify_country(token: &str) -> String {
    let squashed: String = token
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    COUNTRY_TOKENS
        .iter()
        .find(|(needle, _)| squashed.contains(needle))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| title_case(token))
}

pub fn title_case(token: &str) -> String {
    token
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn currency_for_country(country: &str) -> Option<Currency> {
    COUNTRY_CURRENCY
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(country))
        .map(|(_, ccy)| *ccy)
}

/// Currency for a venue file: the country table first, then header hints.
pub fn currency_for_file(country: &str, headers: &[String]) -> Currency {
    if let Some(c) = currency_for_country(country) {
        return c;
    }
    let joined = headers.join(" ").to_lowercase();
    if joined.contains("(gbp)") || joined.contains('£') {
        Currency::Gbp
    } else if joined.contains("(eur)") || joined.contains('€') {
        Currency::Eur
    } else {
        Currency::Usd
    }
}

/// `*_csv.csv` files in `dir`, sorted by name.
pub fn discover_venue_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("List data dir {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_venue = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(VENUE_SUFFIX));
        if path.is_file() && is_venue {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Original-currency price column for a venue file: a published/text column
/// before any numeric legacy column, never a converted `(USD)` column unless
/// nothing else exists.
fn price_column<F: Fn(&str) -> bool>(table: &RawTable, matches: F) -> Option<usize> {
    table
        .find_column(|h| matches(h) && !h.contains("(usd)"))
        .or_else(|| table.find_column(|h| matches(h)))
}

/// Venues from one file, priced in local currency and converted with `rates`.
///
/// The `(USD)` columns written by `fx refresh` are not read back: USD figures
/// always come from the parsed local price so they track the current rates.
pub fn load_venues(path: &Path, rates: &RateTable, warnings: &mut Vec<String>) -> Result<Vec<Venue>> {
    let table = read_table(path)?;
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_country = classify_country(&file_token(path));
    let currency = currency_for_file(&file_country, &table.headers);

    let Some(name_col) = table
        .column("Venue")
        .or_else(|| table.column("Venue Name"))
        .or_else(|| table.column("Name"))
    else {
        warnings.push(format!("{}: missing column 'Venue'; file skipped", file));
        return Ok(Vec::new());
    };
    let region_col = table.column("Region/Country").or_else(|| table.column("Region"));
    let style_col = table.column("Style");
    let seated_col = table.find_column(|h| h.contains("seated"));
    let reception_col = table.find_column(|h| h.contains("reception") || h.starts_with("evening"));
    let hire_col = price_column(&table, |h| h.starts_with("published"))
        .or_else(|| price_column(&table, |h| h.starts_with("base price")));
    let per_head_col = price_column(&table, |h| {
        h.contains("per head") || h.contains("menu from") || h.contains("per person")
    })
    .or_else(|| price_column(&table, |h| h.starts_with("price per guest")));
    let url_col = table.find_column(|h| h.starts_with("pricing source"));
    let website_col = table.column("Website");
    let exclusive_col = table.find_column(|h| h.starts_with("exclusive use"));
    let bedrooms_col = table.find_column(|h| h.contains("bedrooms"));
    let airports_col = table.find_column(|h| h.contains("airport"));

    if hire_col.is_none() && per_head_col.is_none() {
        warnings.push(format!("{}: no pricing columns; default estimates used", file));
    }
    if seated_col.is_none() {
        warnings.push(format!("{}: missing seated capacity column; capacity filter passes all venues", file));
    }

    let owned = |row: usize, col: Option<usize>| table.cell(row, col).map(str::to_string);
    let mut venues = Vec::with_capacity(table.rows.len());
    for i in 0..table.rows.len() {
        let Some(name) = table.cell(i, Some(name_col)) else {
            continue;
        };
        let country = table
            .cell(i, region_col)
            .and_then(|region| ROW_COUNTRIES.iter().find(|c| region.contains(*c)))
            .map(|c| c.to_string())
            .unwrap_or_else(|| file_country.clone());
        let seated = table.cell(i, seated_col).and_then(pricing::parse_capacity);
        let hire_text = owned(i, hire_col);
        let per_head_text = owned(i, per_head_col);
        let price = pricing::estimate(&PriceInput {
            name,
            country: &country,
            seated_capacity: seated,
            hire_text: hire_text.as_deref(),
            per_head_text: per_head_text.as_deref(),
        });
        venues.push(Venue {
            name: name.to_string(),
            country,
            style: owned(i, style_col).unwrap_or_default(),
            seated_capacity: seated,
            reception_capacity: table.cell(i, reception_col).and_then(pricing::parse_capacity),
            currency,
            hire_text,
            per_head_text,
            price,
            base_price_usd: fx::convert(price.base, currency, rates).round_dp(2),
            per_guest_usd: fx::convert(price.per_guest, currency, rates).round_dp(2),
            pricing_url: owned(i, url_col),
            website: owned(i, website_col),
            exclusive_use: owned(i, exclusive_col),
            bedrooms: owned(i, bedrooms_col),
            airports: owned(i, airports_col),
            source_file: file.clone(),
        });
    }
    tracing::debug!(file = %file, venues = venues.len(), %currency, "venues loaded");
    Ok(venues)
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "" | "0" | "0.0" | "false" | "no" | "n" => Some(false),
        "1" | "1.0" | "true" | "yes" | "y" | "x" | "✓" | "✔" => Some(true),
        _ => None,
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    let t = raw.trim();
    t.parse::<u32>()
        .ok()
        .or_else(|| t.parse::<f64>().ok().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u32))
}

pub fn load_guests(path: &Path, warnings: &mut Vec<String>) -> Result<GuestList> {
    let table = read_table(path)?;
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let Some(name_col) = table.column("Name") else {
        warnings.push(format!("{}: missing column 'Name'; guest list disabled", file));
        return Ok(GuestList::default());
    };
    let category_col = table.column("Category");
    let source_col = table.column("Source");
    let total_col = table.column("Total Events");
    let table_col = table.column("Table");
    if category_col.is_none() {
        warnings.push(format!("{}: missing column 'Category'; category filters and grouping disabled", file));
    }
    if source_col.is_none() {
        warnings.push(format!("{}: missing column 'Source'; source analytics disabled", file));
    }

    let event_cols: Vec<usize> = (0..table.headers.len())
        .filter(|&c| !GUEST_ATTRIBUTES.contains(&normalize_header(&table.headers[c]).as_str()))
        .filter(|&c| table.rows.iter().all(|r| r.get(c).is_none_or(|v| parse_flag(v).is_some())))
        .filter(|&c| table.rows.iter().any(|r| r.get(c).is_some_and(|v| !v.trim().is_empty())))
        .collect();
    if event_cols.is_empty() {
        warnings.push(format!("{}: no event attendance columns found", file));
    }

    let mut seen = HashSet::new();
    let mut guests = Vec::with_capacity(table.rows.len());
    for i in 0..table.rows.len() {
        let Some(name) = table.cell(i, Some(name_col)) else {
            continue;
        };
        if !seen.insert(name.to_string()) {
            warnings.push(format!("{}: duplicate guest '{}' ignored", file, name));
            continue;
        }
        let attendance: Vec<bool> = event_cols
            .iter()
            .map(|&c| table.cell(i, Some(c)).and_then(parse_flag).unwrap_or(false))
            .collect();
        let counted = attendance.iter().filter(|a| **a).count() as u32;
        guests.push(Guest {
            name: name.to_string(),
            category: table.cell(i, category_col).unwrap_or("Uncategorized").to_string(),
            source: table.cell(i, source_col).unwrap_or("Unknown").to_string(),
            total_events: table.cell(i, total_col).and_then(parse_count).unwrap_or(counted),
            attendance,
            table: table.cell(i, table_col).and_then(parse_count).filter(|t| *t > 0),
        });
    }
    tracing::debug!(file = %file, guests = guests.len(), events = event_cols.len(), "guest roster loaded");
    Ok(GuestList {
        events: event_cols.iter().map(|&c| table.headers[c].clone()).collect(),
        guests,
        has_category: category_col.is_some(),
        has_source: source_col.is_some(),
    })
}

/// Where a workspace comes from: the data directory plus session overrides.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub data_dir: PathBuf,
    pub guest_file: Option<PathBuf>,
    pub venue_files: Vec<PathBuf>,
}

/// Everything one command needs, loaded in a single pass.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub data_dir: PathBuf,
    pub venues: Vec<Venue>,
    pub guests: GuestList,
    pub rates: RateTable,
    pub snapshot: Option<RateSnapshot>,
    pub warnings: Vec<String>,
}

impl Workspace {
    pub fn load(src: &Sources) -> Result<Self> {
        let mut warnings = Vec::new();
        let snapshot = match fx::load_snapshot(&src.data_dir) {
            Ok(s) => s,
            Err(e) => {
                warnings.push(format!("{:#}; using fallback exchange rates", e));
                None
            }
        };
        let rates = snapshot.as_ref().map(RateTable::from_snapshot).unwrap_or_default();

        let venue_files = if src.venue_files.is_empty() {
            discover_venue_files(&src.data_dir).unwrap_or_else(|e| {
                warnings.push(format!("{:#}", e));
                Vec::new()
            })
        } else {
            src.venue_files.clone()
        };
        if venue_files.is_empty() {
            warnings.push(format!("no venue files (*{}) in {}", VENUE_SUFFIX, src.data_dir.display()));
        }
        let mut venues = Vec::new();
        for path in &venue_files {
            match load_venues(path, &rates, &mut warnings) {
                Ok(mut vs) => venues.append(&mut vs),
                Err(e) => warnings.push(format!("{:#}", e)),
            }
        }

        let guest_path = src
            .guest_file
            .clone()
            .unwrap_or_else(|| src.data_dir.join(GUEST_FILE));
        let guests = if guest_path.exists() {
            match load_guests(&guest_path, &mut warnings) {
                Ok(g) => g,
                Err(e) => {
                    warnings.push(format!("{:#}", e));
                    GuestList::default()
                }
            }
        } else {
            warnings.push(format!("guest roster {} not found", guest_path.display()));
            GuestList::default()
        };

        tracing::debug!(venues = venues.len(), guests = guests.guests.len(), warnings = warnings.len(), "workspace loaded");
        Ok(Self {
            data_dir: src.data_dir.clone(),
            venues,
            guests,
            rates,
            snapshot,
            warnings,
        })
    }

    pub fn venue(&self, name: &str) -> Result<&Venue, PlannerError> {
        self.venues
            .iter()
            .find(|v| v.name == name)
            .or_else(|| self.venues.iter().find(|v| v.name.eq_ignore_ascii_case(name)))
            .ok_or_else(|| PlannerError::NotFound {
                entity_type: "Venue",
                identifier: name.to_string(),
            })
    }
}
