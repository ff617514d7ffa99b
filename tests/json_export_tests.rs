use sdlang::from_str;
use serde_json::json;

#[test]
fn test_tag_tree_exports_to_json() {
    let root = from_str(
        "person \"Akiko\" 32 ja:nick=\"Aki\" active=on {\n    born 1970/12/05\n    key [AQID]\n}",
    )
    .unwrap();

    let exported = serde_json::to_value(root.child("person").unwrap()).unwrap();
    assert_eq!(
        exported,
        json!({
            "namespace": "",
            "name": "person",
            "values": ["Akiko", 32],
            "attributes": { "active": true, "ja:nick": "Aki" },
            "children": [
                {
                    "namespace": "",
                    "name": "born",
                    "values": ["1970/12/05"],
                    "attributes": {},
                    "children": []
                },
                {
                    "namespace": "",
                    "name": "key",
                    "values": [[1, 2, 3]],
                    "attributes": {},
                    "children": []
                }
            ]
        })
    );
}

#[test]
fn test_special_literals_export_as_text() {
    let root = from_str("t null 12.50BD 2005/12/05 14:00-JST 01:30:00").unwrap();
    let exported = serde_json::to_value(root.child("t").unwrap().values().as_slice()).unwrap();
    assert_eq!(
        exported,
        json!([null, "12.50", "2005/12/05 14:00:00-JST", "01:30:00"])
    );
}
