use contactbook_core::{
    read_contact_file, to_contact_document_json, ContactStore, SourceError,
};
use std::io::Write;

const DOCUMENT: &str = r#"{
  "contacts": [
    {
      "id": 1,
      "firstName": "Ana",
      "lastName": "Levi",
      "role": "Clerk",
      "contactType": "Employee",
      "image": "ana",
      "mainContact": true,
      "contactDetails": {
        "preferredLanguage": "Hebrew",
        "phoneNumbers": [{ "type": "Work", "number": "0501234567" }],
        "emails": [{ "type": "Private", "email": "ana@example.com" }]
      },
      "mailingAddress": "1 Main St",
      "billingInformation": "",
      "tags": "vip",
      "isActive": true
    },
    {
      "id": 2,
      "firstName": "Ben",
      "lastName": "Cohen",
      "role": "Driver",
      "contactType": "Contractor",
      "contactDetails": {
        "preferredLanguage": "English",
        "phoneNumbers": [],
        "emails": []
      }
    }
  ]
}"#;

#[test]
fn reads_document_file_into_store() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DOCUMENT.as_bytes()).unwrap();

    let mut store = ContactStore::in_memory();
    assert!(store.load_or_empty(read_contact_file(file.path())));

    assert_eq!(store.len(), 2);
    let ana = store.get(1).unwrap();
    assert_eq!(ana.image_asset_path(), "/img/ana.jpg");
    assert_eq!(ana.mailing_address.as_ref().unwrap().address, "1 Main St");
    assert_eq!(ana.billing_information, None);
    assert_eq!(store.get(2).unwrap().image_asset_path(), "/img/default.jpg");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = read_contact_file(&path).unwrap_err();
    match err {
        SourceError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn written_document_reads_back_identically() {
    let mut store = ContactStore::in_memory();
    store.load(contactbook_core::parse_contact_document(DOCUMENT).unwrap()).unwrap();

    let encoded = to_contact_document_json(store.get_all()).unwrap();
    let decoded = contactbook_core::parse_contact_document(&encoded).unwrap();
    assert_eq!(decoded, store.get_all());
}
