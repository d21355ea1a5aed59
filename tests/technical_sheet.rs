use chrono::{TimeZone, Utc};

use ficha_pdf::{
    generate_technical_sheet, render_technical_sheet, CircuitRow, DirectorySink, LayoutConfig, MemorySink,
    RendererError, SheetAssets, TechnicalSheetRecord,
};

fn record(circuits: usize) -> TechnicalSheetRecord {
    TechnicalSheetRecord {
        company_logo_ref: None,
        company_name: Some("Volt Instalações".to_string()),
        title: "Quadro QDC-01".to_string(),
        location_label: "Bloco A - Ap 204".to_string(),
        installation_date: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
        technical_responsible: "Eng. Marina Souza".to_string(),
        sheet_version: "v1.0".to_string(),
        circuits: (1..=circuits)
            .map(|i| CircuitRow::new(format!("Circuito {}", i), "20A", "2.5"))
            .collect(),
        reference_standard_note: None,
        residual_device_installed: true,
        residual_device_extra_note: None,
        public_access_text: None,
        public_sheet_link: Some("https://anode.app/f/abc123".to_string()),
        electrician_name: "Carlos Lima".to_string(),
        electrician_signature_ref: None,
        electrician_contact: "(11) 98888-7777".to_string(),
        gatehouse_extension: Some("90".to_string()),
        created_at: Utc.with_ymd_and_hms(2024, 3, 5, 17, 30, 0).unwrap(),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn renders_pdf_with_derived_filename() {
    let document = render_technical_sheet(&record(5), &LayoutConfig::default(), &SheetAssets::default()).unwrap();

    assert_eq!(document.filename, "ficha-tecnica_bloco_a_-_ap_204.pdf");
    assert_eq!(document.page_count, 1);
    assert!(document.bytes.starts_with(b"%PDF-"));
    assert!(contains(&document.bytes, b"/Count 1"));
    assert!(contains(&document.bytes, b"/Helvetica-Bold"));
}

#[test]
fn long_tables_span_pages() {
    let document = render_technical_sheet(&record(80), &LayoutConfig::default(), &SheetAssets::default()).unwrap();
    assert!(document.page_count >= 2);
    let count = format!("/Count {}", document.page_count);
    assert!(contains(&document.bytes, count.as_bytes()));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let config = LayoutConfig::default();
    let assets = SheetAssets::default();
    let first = render_technical_sheet(&record(30), &config, &assets).unwrap();
    let second = render_technical_sheet(&record(30), &config, &assets).unwrap();
    assert_eq!(first, second);
}

#[test]
fn directory_sink_receives_exact_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path().join("fichas"));
    let document = generate_technical_sheet(&record(3), &LayoutConfig::default(), &SheetAssets::default(), &mut sink).unwrap();

    let written = std::fs::read(dir.path().join("fichas").join("ficha-tecnica_bloco_a_-_ap_204.pdf")).unwrap();
    assert_eq!(written, document.bytes);
}

#[test]
fn oversized_row_fails_without_delivery() {
    let mut sheet = record(0);
    sheet.circuits.push(CircuitRow::new("palavra ".repeat(3_000), "20A", "2.5"));

    let mut sink = MemorySink::new();
    let failure = generate_technical_sheet(&sheet, &LayoutConfig::default(), &SheetAssets::default(), &mut sink).unwrap_err();

    assert!(matches!(failure.cause(), RendererError::TableOverflow { row: 1, .. }));
    assert!(failure.to_string().starts_with("document generation failed"));
    assert!(sink.documents.is_empty());
}

#[test]
fn invalid_config_is_a_generation_failure() {
    let mut config = LayoutConfig::default();
    config.palette.accent = "azul".to_string();
    let failure = render_technical_sheet(&record(1), &config, &SheetAssets::default()).unwrap_err();
    assert!(matches!(failure.cause(), RendererError::ConfigError(_)));
}

#[test]
fn store_json_renders() {
    let json = r#"{
        "nomeEmpresa": "Volt Instalações",
        "titulo": "Quadro QDC-02",
        "localizacao": "Praça Central #3",
        "dataInstalacao": "2024-03-05T12:00:00Z",
        "responsavelTecnico": "Eng. Marina Souza",
        "circuitos": [{"nome": "Iluminação", "disjuntor": "10A", "bitolaCabo": "1.5"}],
        "nomeEletricista": "Carlos Lima",
        "contatoEletricista": "(11) 98888-7777",
        "createdAt": "2024-03-05T17:30:00Z"
    }"#;
    let sheet = TechnicalSheetRecord::from_json_str(json).unwrap();
    let document = render_technical_sheet(&sheet, &LayoutConfig::default(), &SheetAssets::default()).unwrap();
    assert_eq!(document.filename, "ficha-tecnica_praa_central_3.pdf");
}
