//! Text rendering of source outcomes
//!
//! Rendering is a pure function of its input: the same outcome always yields
//! byte-identical text. The output feeds the itinerary generator.

use std::borrow::Cow;

use crate::models::{AttractionRecord, Category, FlightRecord, HotelRecord, SourceOutcome};

/// Descriptions longer than this many characters are truncated
pub const MAX_DESCRIPTION_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// A record type that knows its category and how to lay out its fields
pub trait RenderRecord {
    const CATEGORY: Category;
    /// Header line above the record blocks
    const HEADER: &'static str;
    /// Label of each numbered block, e.g. "Flight"
    const LABEL: &'static str;

    /// Append one labelled line per field, in declaration order
    fn write_fields(&self, out: &mut String);
}

/// The line rendered when a category succeeded with no records
#[must_use]
pub fn sentinel(category: Category) -> String {
    format!("ℹ️ No {category} information available.")
}

/// Render one category's outcome
#[must_use]
pub fn render<R: RenderRecord>(outcome: &SourceOutcome<R>) -> String {
    let records = match outcome {
        SourceOutcome::Error(err) => {
            return format!("❌ **Error retrieving {}**: {}", R::CATEGORY, err.message);
        }
        SourceOutcome::Records(records) if records.is_empty() => return sentinel(R::CATEGORY),
        SourceOutcome::Records(records) => records,
    };

    let mut out = format!("{}:\n\n", R::HEADER);
    for (index, record) in records.iter().enumerate() {
        out.push_str(&format!("**{} {}:**\n", R::LABEL, index + 1));
        record.write_fields(&mut out);
        out.push('\n');
    }

    out.trim_end().to_string()
}

/// Cut a description to [`MAX_DESCRIPTION_CHARS`] characters plus an ellipsis
#[must_use]
pub fn truncate_description(description: &str) -> Cow<'_, str> {
    match description.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &description[..cut])),
        None => Cow::Borrowed(description),
    }
}

fn line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    out.push_str(&format!("{label} {value}\n"));
}

impl RenderRecord for FlightRecord {
    const CATEGORY: Category = Category::Flights;
    const HEADER: &'static str = "✈️ **Available Flight Options**";
    const LABEL: &'static str = "Flight";

    fn write_fields(&self, out: &mut String) {
        line(out, "🛬 **Destination:**", &self.destination_airport);
        line(out, "⏱️ **Duration:**", format!("{} minutes", self.duration_minutes));
        line(out, "🛑 **Stops:**", self.stops);
        line(out, "🕔 **Departure:**", &self.departure_time);
        line(out, "🕖 **Arrival:**", &self.arrival_time);
        line(out, "💰 **Price:**", format!("${}", self.price));
    }
}

impl RenderRecord for HotelRecord {
    const CATEGORY: Category = Category::Hotels;
    const HEADER: &'static str = "🏨 **Available Hotel Options**";
    const LABEL: &'static str = "Hotel";

    fn write_fields(&self, out: &mut String) {
        line(out, "🏨 **Name:**", &self.name);
        line(out, "📝 **Description:**", truncate_description(&self.description));
        line(out, "💰 **Cost per night:**", &self.cost_per_night);
        line(out, "⭐ **Rating:**", format!("{:?}", self.rating));
        line(out, "🔗 **More Info:**", format!("[Link]({})", self.link));
    }
}

impl RenderRecord for AttractionRecord {
    const CATEGORY: Category = Category::Attractions;
    const HEADER: &'static str = "🗿 **Available Tourist Attractions**";
    const LABEL: &'static str = "Attraction";

    fn write_fields(&self, out: &mut String) {
        line(out, "🏛️ **Name:**", &self.name);
        line(out, "📝 **Description:**", truncate_description(&self.description));
        line(out, "📍 **Location:**", &self.location);
        line(out, "⭐ **Rating:**", format!("{:?}", self.rating));
        line(out, "🔗 **More Info:**", format!("[Link]({})", self.link));
    }
}
