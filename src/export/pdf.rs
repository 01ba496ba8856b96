//! PDF rendering of transcripts and verdicts.
//!
//! Text is set in the built-in Helvetica face with WinAnsi encoding, so no
//! font file has to be shipped. Characters outside Latin-1 are printed as
//! `?`. Long paragraphs wrap, and pages break when full.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

use crate::judge::Split;
use crate::session::ConversationTurn;
use crate::store::VerdictRecord;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const TITLE_SIZE: i64 = 16;
const BODY_SIZE: i64 = 11;
const LEADING: i64 = 15;
/// Characters per body line at 11pt Helvetica across the text column.
const WRAP_CHARS: usize = 88;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("could not write document: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Pdf(e.to_string())
    }
}

/// Render a chat transcript, one `Label: text` paragraph per turn.
pub fn transcript_pdf(turns: &[ConversationTurn]) -> Result<Vec<u8>, ExportError> {
    let paragraphs: Vec<String> = turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
        .collect();
    render("Language Learning Chat History", &paragraphs)
}

/// Render one verdict with both statements and, when known, the split.
pub fn verdict_pdf(record: &VerdictRecord, split: Option<Split>) -> Result<Vec<u8>, ExportError> {
    let mut paragraphs = vec![
        format!("Theme: {}", record.theme),
        format!("Date: {} UTC", record.created_at.format("%Y-%m-%d %H:%M")),
        format!("{} says: {}", record.user1_name, record.user1_input),
        format!("{} says: {}", record.user2_name, record.user2_input),
        format!("Verdict: {}", record.verdict),
    ];
    if let Some(split) = split {
        paragraphs.push(format!(
            "Split: {} {}% / {} {}%",
            record.user1_name, split.first, record.user2_name, split.second
        ));
    }
    render("JudgeBot Verdict", &paragraphs)
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Map text onto the WinAnsi subset shared with Latin-1.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap on character count.
fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in paragraph.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let needed = current.chars().count()
                + word.chars().count()
                + usize::from(!current.is_empty());
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            while current.chars().count() > width {
                let head: String = current.chars().take(width).collect();
                let tail: String = current.chars().skip(width).collect();
                lines.push(head);
                current = tail;
            }
        }
        lines.push(current);
    }
    lines
}

fn render(title: &str, paragraphs: &[String]) -> Result<Vec<u8>, ExportError> {
    let mut lines: Vec<String> = Vec::new();
    for paragraph in paragraphs {
        lines.extend(wrap(paragraph, WRAP_CHARS));
        lines.push(String::new());
    }

    let first_page_room = ((PAGE_HEIGHT - 2 * MARGIN - 2 * LEADING) / LEADING) as usize;
    let page_room = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

    let mut pages: Vec<&[String]> = Vec::new();
    let split_at = first_page_room.min(lines.len());
    pages.push(&lines[..split_at]);
    for chunk in lines[split_at..].chunks(page_room) {
        pages.push(chunk);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (index, page_lines) in pages.iter().enumerate() {
        let heading = if index == 0 { Some(title) } else { None };
        let page_id = add_page(&mut doc, pages_id, heading, page_lines)?;
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                PAGE_WIDTH.into(),
                PAGE_HEIGHT.into(),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    heading: Option<&str>,
    lines: &[String],
) -> Result<ObjectId, ExportError> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
    ];

    if let Some(title) = heading {
        ops.push(Operation::new("Tf", vec!["F1".into(), TITLE_SIZE.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(to_win_ansi(title))],
        ));
        ops.push(Operation::new(
            "Td",
            vec![Object::Integer(0), (-2 * LEADING).into()],
        ));
    }

    ops.push(Operation::new("Tf", vec!["F1".into(), BODY_SIZE.into()]));
    ops.push(Operation::new("TL", vec![LEADING.into()]));
    for line in lines {
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(to_win_ansi(line))],
        ));
        ops.push(Operation::new("T*", vec![]));
    }
    ops.push(Operation::new("ET", vec![]));

    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TurnRole;
    use chrono::NaiveDate;

    fn turns(n: usize) -> Vec<ConversationTurn> {
        (0..n)
            .map(|i| ConversationTurn::new(TurnRole::User, format!("mensaje número {i}")))
            .collect()
    }

    #[test]
    fn transcript_is_a_pdf_document() {
        let bytes = transcript_pdf(&turns(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn empty_transcript_still_renders_a_page() {
        let bytes = transcript_pdf(&[]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_transcript_breaks_pages() {
        let bytes = transcript_pdf(&turns(80)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 3);
    }

    #[test]
    fn verdict_renders() {
        let record = VerdictRecord {
            id: 1,
            theme: "Roommates".into(),
            user1_name: "Ana".into(),
            user2_name: "Ben".into(),
            user1_input: "He never does the dishes.".into(),
            user2_input: "I cook every night.".into(),
            verdict: "Both share blame: 60% vs 40%.".into(),
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        };
        let split = Some(Split {
            first: 60,
            second: 40,
        });
        let bytes = verdict_pdf(&record, split).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn non_latin_characters_become_question_marks() {
        assert_eq!(to_win_ansi("Olá 🤖"), vec![b'O', b'l', 0xE1, b' ', b'?']);
    }

    #[test]
    fn wrap_respects_width_and_keeps_words() {
        let text = "uno dos tres cuatro cinco seis siete";
        let lines = wrap(text, 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_splits_words_longer_than_width() {
        let lines = wrap(&"a".repeat(25), 10);
        assert_eq!(lines, vec!["a".repeat(10), "a".repeat(10), "a".repeat(5)]);
    }
}
