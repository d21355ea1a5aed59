//! pt-BR text formatting: dates, the footer stamp and the download filename

use chrono::{DateTime, FixedOffset, Utc};

/// Slug used when a location label has no usable characters
pub const EMPTY_SLUG: &str = "sem_local";

/// `dd/MM/yyyy` in the given offset
pub fn format_date(value: &DateTime<Utc>, offset: &FixedOffset) -> String {
    value.with_timezone(offset).format("%d/%m/%Y").to_string()
}

/// Generation stamp printed in every page footer
pub fn footer_stamp(value: &DateTime<Utc>, offset: &FixedOffset) -> String {
    let local = value.with_timezone(offset);
    format!("Gerado em {} às {}", local.format("%d/%m/%Y"), local.format("%H:%M"))
}

/// `Página X de N`
pub fn page_label(page: u32, total: u32) -> String {
    format!("Página {} de {}", page, total)
}

/// Lowercase the label, drop everything except `[a-z0-9]`, `-`, `_` and
/// whitespace, then collapse each whitespace run into one `_`.
pub fn filename_slug(label: &str) -> String {
    let kept: String = label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_' || c.is_whitespace())
        .collect();

    let slug = kept.split_whitespace().collect::<Vec<_>>().join("_");
    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// `<prefix><slug>.pdf`
pub fn document_filename(prefix: &str, location_label: &str) -> String {
    format!("{}{}.pdf", prefix, filename_slug(location_label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn brasilia() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date, &brasilia()), "05/03/2024");
    }

    #[test]
    fn test_format_date_uses_offset() {
        // 01:30 UTC is still the previous evening in Brasília
        let date = Utc.with_ymd_and_hms(2024, 3, 6, 1, 30, 0).unwrap();
        assert_eq!(format_date(&date, &brasilia()), "05/03/2024");
    }

    #[test]
    fn test_footer_stamp() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 17, 30, 0).unwrap();
        assert_eq!(footer_stamp(&date, &brasilia()), "Gerado em 05/03/2024 às 14:30");
        assert_eq!(page_label(1, 2), "Página 1 de 2");
    }

    #[test]
    fn test_slug_exact() {
        assert_eq!(filename_slug("Bloco A - Ap 204"), "bloco_a_-_ap_204");
        assert_eq!(document_filename("ficha-tecnica_", "Bloco A - Ap 204"), "ficha-tecnica_bloco_a_-_ap_204.pdf");
    }

    #[test]
    fn test_slug_drops_disallowed_characters() {
        assert_eq!(filename_slug("Praça Central #3"), "praa_central_3");
        assert_eq!(filename_slug("  Casa   de\tMáquinas  "), "casa_de_mquinas");
        assert_eq!(filename_slug("sala_01/02"), "sala_0102");
    }

    #[test]
    fn test_slug_fallback() {
        assert_eq!(filename_slug("   "), EMPTY_SLUG);
        assert_eq!(filename_slug("###"), EMPTY_SLUG);
    }
}
