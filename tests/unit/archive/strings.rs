use super::*;

#[test]
fn two_entries_resolve_and_unknown_passes_through() {
    let table = TranslationTable::from_text("\"A\" = \"B\"\n\"C\" = \"D\"");
    assert_eq!(table.len(), 2);
    assert_eq!(table.lookup("A"), "B");
    assert_eq!(table.lookup("C"), "D");
    assert_eq!(table.lookup("E"), "E");
    assert_eq!(table.get("E"), None);
}

#[test]
fn malformed_lines_are_skipped() {
    let text = "/* comment */\n\"gate\" = \"Puerta\";\nnot an entry\n\"broken\" =\n\n\"seat\" = \"Asiento\";";
    let table = TranslationTable::from_text(text);
    assert_eq!(table.len(), 2);
    assert_eq!(table.lookup("gate"), "Puerta");
    assert_eq!(table.lookup("seat"), "Asiento");
}

#[test]
fn crlf_and_escapes_are_handled() {
    let text = "\"say \\\"hi\\\"\" = \"di \\\"hola\\\"\";\r\n\"two\\nlines\" = \"dos\\nlineas\";\r\n";
    let table = TranslationTable::from_text(text);
    assert_eq!(table.lookup("say \"hi\""), "di \"hola\"");
    assert_eq!(table.lookup("two\nlines"), "dos\nlineas");
}

#[test]
fn utf16_with_bom_is_decoded() {
    let text = "\"Boarding\" = \"Embarque\";";
    let mut le = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        le.extend_from_slice(&unit.to_le_bytes());
    }
    let mut be = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        be.extend_from_slice(&unit.to_be_bytes());
    }

    assert_eq!(TranslationTable::parse(&le).lookup("Boarding"), "Embarque");
    assert_eq!(TranslationTable::parse(&be).lookup("Boarding"), "Embarque");
}

#[test]
fn utf8_bom_is_stripped() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("\"Gate\" = \"Tor\"".as_bytes());
    let table = TranslationTable::parse(&bytes);
    assert_eq!(table.iter().collect::<Vec<_>>(), vec![("Gate", "Tor")]);
}
