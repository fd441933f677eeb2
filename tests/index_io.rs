//! Index file round-trips against hand-written fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use spritefont::{Image, SpriteFont, TextureCache};

fn fixture_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "spritefont-{}-{}",
        tag,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// A one-page index with three glyphs backed by a 16x16 solid white PNG.
fn write_fixture(dir: &Path) -> PathBuf {
    let mut page = Image::new(16, 16, 4);
    page.data_mut().fill(255);
    page.save_png(&dir.join("tiny_0.png")).unwrap();

    let xml = r#"<?xml version="1.0"?>
<font>
    <info face="Tiny" size="16"/>
    <common lineHeight="24" pages="1"/>
    <pages>
        <page id="0" file="tiny_0.png"/>
    </pages>
    <chars count="3">
        <char id="65" x="1" y="1" width="6" height="8" xoffset="0" yoffset="2" advance_x="7" page="0"/>
        <char id="66" x="8" y="1" width="6" height="8" xoffset="1" yoffset="2" advance_x="7" page="0"/>
        <char id="1071" x="1" y="10" width="6" height="5" xoffset="0" yoffset="5" advance_x="7" page="0"/>
    </chars>
</font>
"#;
    let index = dir.join("tiny.fnt");
    fs::write(&index, xml).unwrap();
    index
}

#[test]
fn loads_a_hand_written_index() {
    let dir = fixture_dir("load");
    let index = write_fixture(&dir);

    let mut cache = TextureCache::new();
    let font = SpriteFont::load(&index, &mut cache);

    assert_eq!(font.face_name(), "Tiny");
    assert_eq!(font.size(), 16);
    assert_eq!(font.line_height(), 24);
    assert_eq!(font.textures().len(), 1);
    assert_eq!(font.glyphs().len(), 3);

    let a = font.glyphs()[&0x41];
    assert_eq!((a.rect.pos.x, a.rect.pos.y), (1, 1));
    assert_eq!((a.rect.size.x, a.rect.size.y), (6, 8));
    assert_eq!((a.offset.x, a.offset.y), (0, 2));
    assert_eq!(a.advance_x, 7);
    assert_eq!(a.page, 0);

    // Cyrillic Ya sits well outside ASCII.
    let ya = font.glyphs()[&0x042F];
    assert_eq!((ya.rect.pos.x, ya.rect.pos.y), (1, 10));
    assert_eq!(ya.page, 0);

    let page = font.textures()[0].image();
    assert_eq!((page.width(), page.height()), (16, 16));
    assert_eq!(page.components(), 4);
}

#[test]
fn load_save_reload_preserves_the_index() {
    let dir = fixture_dir("roundtrip");
    let index = write_fixture(&dir);

    let mut cache = TextureCache::new();
    let font = SpriteFont::load(&index, &mut cache);

    let out_dir = fixture_dir("roundtrip-out");
    let out = out_dir.join("copy.fnt");
    font.save(&out);
    assert!(out.exists());
    assert!(out_dir.join("copy_0.png").exists());

    let reloaded = SpriteFont::load(&out, &mut cache);
    assert_eq!(reloaded.face_name(), font.face_name());
    assert_eq!(reloaded.size(), font.size());
    assert_eq!(reloaded.line_height(), font.line_height());
    assert_eq!(reloaded.textures().len(), font.textures().len());
    assert_eq!(reloaded.glyphs(), font.glyphs());
}

#[test]
fn saved_chars_are_sorted_by_code_point() {
    let dir = fixture_dir("sorted");
    let index = write_fixture(&dir);

    let mut cache = TextureCache::new();
    let font = SpriteFont::load(&index, &mut cache);

    let out = dir.join("sorted.fnt");
    font.save(&out);

    let text = fs::read_to_string(&out).unwrap();
    let doc = roxmltree::Document::parse(&text).unwrap();
    let chars = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("chars"))
        .unwrap();

    let ids: Vec<u32> = chars
        .children()
        .filter(|n| n.has_tag_name("char"))
        .map(|n| n.attribute("id").unwrap().parse().unwrap())
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    let count: usize = chars.attribute("count").unwrap().parse().unwrap();
    assert_eq!(count, ids.len());
}

#[test]
fn save_rejects_foreign_extensions() {
    let dir = fixture_dir("ext");
    let index = write_fixture(&dir);

    let mut cache = TextureCache::new();
    let font = SpriteFont::load(&index, &mut cache);

    let out = dir.join("wrong.png");
    font.save(&out);
    assert!(!out.exists());
}

#[test]
fn broken_index_loads_as_an_empty_font() {
    let dir = fixture_dir("broken");
    let mut cache = TextureCache::new();

    let not_xml = dir.join("garbage.fnt");
    fs::write(&not_xml, "not xml at all <<<").unwrap();
    let font = SpriteFont::load(&not_xml, &mut cache);
    assert_eq!(font.glyphs().len(), 0);
    assert_eq!(font.textures().len(), 0);
    assert_eq!(font.line_height(), 0);

    let wrong_root = dir.join("wrong_root.fnt");
    fs::write(&wrong_root, "<sprites></sprites>").unwrap();
    let font = SpriteFont::load(&wrong_root, &mut cache);
    assert_eq!(font.glyphs().len(), 0);

    let no_pages = dir.join("no_pages.fnt");
    fs::write(
        &no_pages,
        "<font><common lineHeight=\"10\" pages=\"0\"/></font>",
    )
    .unwrap();
    let font = SpriteFont::load(&no_pages, &mut cache);
    assert_eq!(font.line_height(), 0);
}
