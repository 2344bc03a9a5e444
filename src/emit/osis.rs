//! OSIS commentary output.
//!
//! Each record becomes one annotated section:
//!
//! ```xml
//! <div type="section" annotateType="commentary" annotateRef="John.3.16">
//!   <title type="sub"><i>[230 AD]</i> Origen on John 3:16</title>
//!   <p>In the beginning...</p>
//!   <p>Commentary on John</p>
//! </div>
//! ```
//!
//! (emitted without the whitespace). Sections are joined with newlines and
//! placed inside the `bookGroup` div of a fixed OSIS envelope.

use anyhow::{Context, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::config::{OsisConfig, UnknownBookPolicy};
use crate::models::Commentary;
use crate::verse::{canonical_ref, reference};

/// How many records made it into the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OsisStats {
    pub written: usize,
    pub dropped: usize,
}

/// Date prefix of a section title, e.g. `[230 AD]` or `[BC 150]`.
pub fn date_label(date: i64) -> Option<String> {
    match date {
        d if d > 0 => Some(format!("[{} AD]", d)),
        d if d < 0 => Some(format!("[BC {}]", -d)),
        _ => None,
    }
}

/// Title text after the date prefix: `Origen (Homily 2) on John 3:16`.
pub fn title_text(commentary: &Commentary) -> String {
    let mut text = commentary.father_name.clone();
    if !commentary.append_to_author_name.is_empty() {
        text.push(' ');
        text.push_str(&commentary.append_to_author_name);
    }
    text.push_str(" on ");
    text.push_str(&reference(
        &commentary.bible_book_name,
        &commentary.bible_verse_range,
    ));
    text
}

/// Renders one record as a section fragment. Returns `None` when the record
/// is dropped under [`UnknownBookPolicy::Skip`].
pub fn commentary_to_xml(
    commentary: &Commentary,
    policy: UnknownBookPolicy,
) -> Result<Option<String>> {
    let canonical = canonical_ref(&commentary.bible_book_name, &commentary.bible_verse_range);
    let annotate_ref = match canonical {
        Ok(r) => Some(r),
        Err(e) => {
            tracing::warn!(
                father = %commentary.father_name,
                file = %commentary.filename,
                entry = commentary.entry_index,
                "{}",
                e
            );
            match policy {
                UnknownBookPolicy::Degrade => None,
                UnknownBookPolicy::Skip => return Ok(None),
            }
        }
    };

    let mut writer = Writer::new(Vec::new());

    let mut div = BytesStart::new("div");
    div.push_attribute(("type", "section"));
    div.push_attribute(("annotateType", "commentary"));
    if let Some(r) = annotate_ref.as_deref() {
        div.push_attribute(("annotateRef", r));
    }
    writer.write_event(Event::Start(div))?;

    let mut title = BytesStart::new("title");
    title.push_attribute(("type", "sub"));
    writer.write_event(Event::Start(title))?;
    if let Some(label) = date_label(commentary.date) {
        writer.write_event(Event::Start(BytesStart::new("i")))?;
        writer.write_event(Event::Text(BytesText::new(&label)))?;
        writer.write_event(Event::End(BytesEnd::new("i")))?;
        writer.write_event(Event::Text(BytesText::new(" ")))?;
    }
    writer.write_event(Event::Text(BytesText::new(&title_text(commentary))))?;
    writer.write_event(Event::End(BytesEnd::new("title")))?;

    write_paragraph(&mut writer, &commentary.txt)?;
    let source_title = commentary.source_title.trim();
    if !source_title.is_empty() {
        write_paragraph(&mut writer, source_title)?;
    }

    writer.write_event(Event::End(BytesEnd::new("div")))?;

    let xml = String::from_utf8(writer.into_inner()).context("OSIS fragment is not UTF-8")?;
    Ok(Some(xml))
}

fn write_paragraph(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("p")))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("p")))?;
    Ok(())
}

/// Fragments for every record, newline-joined, in record order.
pub fn to_osis(records: &[Commentary], policy: UnknownBookPolicy) -> Result<(String, OsisStats)> {
    let mut stats = OsisStats::default();
    let mut fragments = Vec::with_capacity(records.len());
    for commentary in records {
        match commentary_to_xml(commentary, policy)? {
            Some(xml) => {
                fragments.push(xml);
                stats.written += 1;
            }
            None => stats.dropped += 1,
        }
    }
    Ok((fragments.join("\n"), stats))
}

/// Places the section fragments into the OSIS envelope.
pub fn render_document(config: &OsisConfig, commentaries: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<osis
	xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
	xmlns="http://www.bibletechnologies.net/2003/OSIS/namespace"
	xmlns:osis="http://www.bibletechnologies.net/2003/OSIS/namespace"
	xsi:schemaLocation="http://www.bibletechnologies.net/2003/OSIS/namespace http://www.bibletechnologies.net/osisCore.2.1.1.xsd">
	<osisText osisIDWork="{work}" osisRefWork="{ref_work}" xml:lang="{lang}" canonical="true">
		<header>
			<work osisWork="{work}">
				<title>{title}</title>
			</work>
		</header>
		<div type="bookGroup">
			{commentaries}
		</div>
	</osisText>
</osis>
"#,
        work = escape(config.work.as_str()),
        ref_work = escape(config.ref_work.as_str()),
        lang = escape(config.lang.as_str()),
        title = escape(config.title.as_str()),
        commentaries = commentaries,
    )
}

pub fn write_osis<W: Write>(
    mut writer: W,
    records: &[Commentary],
    config: &OsisConfig,
) -> Result<OsisStats> {
    let (fragments, stats) = to_osis(records, config.unknown_book)?;
    writer.write_all(render_document(config, &fragments).as_bytes())?;
    if stats.dropped > 0 {
        tracing::warn!(dropped = stats.dropped, "records without an OSIS book left out");
    }
    Ok(stats)
}
