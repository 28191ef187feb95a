//! Tesseract-style TSV output
//!
//! Columns: `level page_num block_num par_num line_num word_num left top
//! width height conf text`. Only word rows (level 5) carry text.

use crate::error::{Error, Result};
use crate::sdk::{Rect, Recognition, TextBox};

const WORD_LEVEL: u32 = 5;
const COLUMNS: usize = 12;

struct Word {
    line_key: (u32, u32, u32, u32),
    bbox: Rect,
    conf: f32,
    text: String,
}

fn parse_field<T: std::str::FromStr>(fields: &[&str], index: usize, line_no: usize) -> Result<T> {
    fields[index]
        .trim()
        .parse()
        .map_err(|_| Error::Parse(format!("line {}: bad value {:?}", line_no, fields[index])))
}

fn parse_word(line: &str, line_no: usize) -> Result<Option<Word>> {
    let fields: Vec<&str> = line.splitn(COLUMNS, '\t').collect();
    if fields.len() < COLUMNS - 1 {
        return Err(Error::Parse(format!(
            "line {}: expected {} columns, found {}",
            line_no,
            COLUMNS,
            fields.len()
        )));
    }

    let level: u32 = parse_field(&fields, 0, line_no)?;
    if level != WORD_LEVEL {
        return Ok(None);
    }

    let conf: f32 = parse_field(&fields, 10, line_no)?;
    let text = fields.get(11).map(|t| t.trim()).unwrap_or("");
    if conf < 0.0 || text.is_empty() {
        return Ok(None);
    }

    Ok(Some(Word {
        line_key: (
            parse_field(&fields, 1, line_no)?,
            parse_field(&fields, 2, line_no)?,
            parse_field(&fields, 3, line_no)?,
            parse_field(&fields, 4, line_no)?,
        ),
        bbox: Rect::new(
            parse_field(&fields, 6, line_no)?,
            parse_field(&fields, 7, line_no)?,
            parse_field(&fields, 8, line_no)?,
            parse_field(&fields, 9, line_no)?,
        ),
        conf,
        text: text.to_string(),
    }))
}

/// Group TSV word rows into one text box per line
pub fn parse_tsv(output: &str) -> Result<Recognition> {
    // (key, words' text, union box, conf sum, word count)
    let mut lines: Vec<((u32, u32, u32, u32), Vec<String>, Rect, f32, u32)> = Vec::new();

    for (index, line) in output.lines().enumerate() {
        if index == 0 && line.starts_with("level") {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let Some(word) = parse_word(line, index + 1)? else {
            continue;
        };

        match lines.last_mut() {
            Some((key, texts, bbox, conf_sum, count)) if *key == word.line_key => {
                texts.push(word.text);
                *bbox = bbox.union(&word.bbox);
                *conf_sum += word.conf;
                *count += 1;
            }
            _ => lines.push((word.line_key, vec![word.text], word.bbox, word.conf, 1)),
        }
    }

    Ok(lines
        .into_iter()
        .map(|(_, texts, bbox, conf_sum, count)| TextBox {
            text: texts.join(" "),
            bbox,
            score: (conf_sum / count as f32 / 100.0).clamp(0.0, 1.0),
        })
        .collect())
}
