// ABOUTME: PPTX generation module for the deckgen application
// ABOUTME: Serializes laid-out slides into a PresentationML package written atomically

use crate::errors::{DeckError, Result};
use crate::layout::{Align, Bullet, Element, Paragraph, Picture, RenderedSlide, TextBox};
use crate::style::{SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::utils;
use log::{debug, info};
use quick_xml::escape::escape;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Finished decks are readable by other users, like a plain `File::create`
#[cfg(unix)]
const DECK_MODE: u32 = 0o644;

/// Left margin per indentation level, in EMU
const LEVEL_INDENT: i64 = 457_200;
const HANGING_INDENT: i64 = -285_750;

/// Document-level metadata for the package
pub struct PptxConfig {
    pub title: String,
    pub creator: String,
}

impl Default for PptxConfig {
    fn default() -> Self {
        Self {
            title: "Presentation".to_string(),
            creator: "deckgen".to_string(),
        }
    }
}

/// A picture part placed in `ppt/media`.
struct MediaPart<'a> {
    name: String,
    picture: &'a Picture,
}

/// Write the slides to `output_file` as a PPTX package.
///
/// The package is assembled in a temporary file next to the destination and
/// moved into place only once complete, so a failed write never leaves a
/// readable partial deck behind.
pub fn write_pptx(slides: &[RenderedSlide], output_file: &Path, config: &PptxConfig) -> Result<()> {
    info!("Generating PPTX with {} slides at {:?}", slides.len(), output_file);

    if slides.is_empty() {
        return Err(DeckError::SerializationFailure(
            "A presentation needs at least one slide".to_string(),
        ));
    }

    let parent = match output_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    utils::ensure_directory_exists(parent)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
        DeckError::SerializationFailure(format!("Failed to create temporary file in {:?}: {}", parent, e))
    })?;

    {
        let mut zip = ZipWriter::new(temp.as_file_mut());
        write_package(&mut zip, slides, config)?;
        zip.finish()?;
    }
    share_readable(temp.as_file())?;

    temp.persist(output_file).map_err(|e| {
        DeckError::SerializationFailure(format!("Failed to move deck into {:?}: {}", output_file, e.error))
    })?;

    info!("PPTX file created at {:?}", output_file);
    Ok(())
}

// Temp files are created owner-only; widen that before the rename.
#[cfg(unix)]
fn share_readable(file: &std::fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(DECK_MODE))
        .map_err(|e| DeckError::SerializationFailure(format!("Failed to set deck permissions: {}", e)))
}

#[cfg(not(unix))]
fn share_readable(_file: &std::fs::File) -> Result<()> {
    Ok(())
}

fn write_package<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    slides: &[RenderedSlide],
    config: &PptxConfig,
) -> Result<()> {
    // Media is numbered across the whole deck; each slide keeps its own list.
    let mut media_by_slide: Vec<Vec<MediaPart<'_>>> = Vec::with_capacity(slides.len());
    let mut media_count = 0;
    for slide in slides {
        let parts = slide
            .pictures()
            .map(|picture| {
                media_count += 1;
                MediaPart {
                    name: format!("image{}.{}", media_count, picture.image.extension),
                    picture,
                }
            })
            .collect();
        media_by_slide.push(parts);
    }

    debug!("Creating PPTX structure: [Content_Types].xml");
    add_part(zip, "[Content_Types].xml", &content_types_xml(slides.len(), &media_by_slide)?)?;

    debug!("Creating PPTX structure: _rels/.rels");
    add_part(zip, "_rels/.rels", &root_rels_xml())?;

    debug!("Creating PPTX structure: docProps");
    add_part(zip, "docProps/app.xml", &app_xml(slides.len()))?;
    add_part(zip, "docProps/core.xml", &core_xml(config))?;

    debug!("Creating PPTX structure: presentation, master, layout, theme");
    add_part(zip, "ppt/presentation.xml", &presentation_xml(slides.len())?)?;
    add_part(zip, "ppt/_rels/presentation.xml.rels", &presentation_rels_xml(slides.len())?)?;
    add_part(zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML)?;
    add_part(zip, "ppt/slideMasters/_rels/slideMaster1.xml.rels", SLIDE_MASTER_RELS_XML)?;
    add_part(zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML)?;
    add_part(zip, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", SLIDE_LAYOUT_RELS_XML)?;
    add_part(zip, "ppt/theme/theme1.xml", THEME_XML)?;

    for (i, (slide, media)) in slides.iter().zip(&media_by_slide).enumerate() {
        let slide_num = i + 1;
        debug!("Creating slide XML: ppt/slides/slide{}.xml ({})", slide_num, slide.kind);

        for part in media {
            add_binary_part(zip, &format!("ppt/media/{}", part.name), &part.picture.image.data)?;
        }
        add_part(
            zip,
            &format!("ppt/slides/_rels/slide{}.xml.rels", slide_num),
            &slide_rels_xml(media)?,
        )?;
        add_part(zip, &format!("ppt/slides/slide{}.xml", slide_num), &slide_xml(slide)?)?;
    }

    Ok(())
}

fn add_part<W: Write + std::io::Seek>(zip: &mut ZipWriter<W>, name: &str, content: &str) -> Result<()> {
    add_binary_part(zip, name, content.as_bytes())
}

fn add_binary_part<W: Write + std::io::Seek>(zip: &mut ZipWriter<W>, name: &str, data: &[u8]) -> Result<()> {
    zip.start_file(name, FileOptions::default())?;
    zip.write_all(data)
        .map_err(|e| DeckError::SerializationFailure(format!("Failed to write {}: {}", name, e)))
}

fn content_types_xml(slide_count: usize, media: &[Vec<MediaPart<'_>>]) -> Result<String> {
    let mut defaults: BTreeMap<&str, &str> = BTreeMap::new();
    defaults.insert("rels", "application/vnd.openxmlformats-package.relationships+xml");
    defaults.insert("xml", "application/xml");
    for part in media.iter().flatten() {
        defaults.insert(part.picture.image.extension, part.picture.image.content_type);
    }

    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    for (ext, content_type) in defaults {
        write!(xml, r#"<Default Extension="{}" ContentType="{}"/>"#, ext, content_type)?;
    }
    for (part, content_type) in [
        ("/ppt/presentation.xml", "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"),
        ("/ppt/slideMasters/slideMaster1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"),
        ("/ppt/slideLayouts/slideLayout1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"),
        ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml"),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
        ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml"),
    ] {
        write!(xml, r#"<Override PartName="{}" ContentType="{}"/>"#, part, content_type)?;
    }
    for i in 1..=slide_count {
        write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            i
        )?;
    }
    xml.push_str("</Types>");
    Ok(xml)
}

fn root_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{REL_NS}/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    )
}

fn app_xml(slide_count: usize) -> String {
    format!(
        r#"{XML_DECL}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>deckgen</Application><Slides>{slide_count}</Slides></Properties>"#
    )
}

fn core_xml(config: &PptxConfig) -> String {
    format!(
        r#"{XML_DECL}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>{}</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created><cp:revision>1</cp:revision></cp:coreProperties>"#,
        escape(config.title.as_str()),
        escape(config.creator.as_str()),
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    )
}

// rId1 is the master, rId2 the theme, slides follow from rId3.
fn presentation_xml(slide_count: usize) -> Result<String> {
    let mut xml = format!("{XML_DECL}<p:presentation {NS} saveSubsetFonts=\"1\">");
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    xml.push_str("<p:sldIdLst>");
    for i in 0..slide_count {
        write!(xml, r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3)?;
    }
    xml.push_str("</p:sldIdLst>");
    write!(xml, r#"<p:sldSz cx="{}" cy="{}"/>"#, SLIDE_WIDTH, SLIDE_HEIGHT)?;
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    Ok(xml)
}

fn presentation_rels_xml(slide_count: usize) -> Result<String> {
    let mut xml = format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_NS}/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{REL_NS}/theme" Target="theme/theme1.xml"/>"#
    );
    for i in 0..slide_count {
        write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
            i + 3,
            REL_NS,
            i + 1
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

// rId1 is the layout, pictures follow from rId2.
fn slide_rels_xml(media: &[MediaPart<'_>]) -> Result<String> {
    let mut xml = format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_NS}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#
    );
    for (i, part) in media.iter().enumerate() {
        write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{}/image" Target="../media/{}"/>"#,
            i + 2,
            REL_NS,
            part.name
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn slide_xml(slide: &RenderedSlide) -> Result<String> {
    let mut xml = format!("{XML_DECL}<p:sld {NS}><p:cSld><p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    let mut picture_index = 0;
    for (i, element) in slide.elements.iter().enumerate() {
        let shape_id = i + 2;
        match element {
            Element::Text(text_box) => write_text_box(&mut xml, shape_id, text_box)?,
            Element::Picture(picture) => {
                picture_index += 1;
                write_picture(&mut xml, shape_id, picture, &format!("rId{}", picture_index + 1))?;
            }
        }
    }

    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    Ok(xml)
}

fn write_frame(xml: &mut String, frame: &crate::style::Rect) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#,
        frame.x, frame.y, frame.width, frame.height
    )?;
    Ok(())
}

fn write_text_box(xml: &mut String, shape_id: usize, text_box: &TextBox) -> Result<()> {
    xml.push_str("<p:sp><p:nvSpPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="{} {}"/>"#,
        shape_id,
        text_box.role.name(),
        shape_id
    )?;
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#);
    write_frame(xml, &text_box.frame)?;
    xml.push_str(r#"<a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0">"#);
    if text_box.autofit {
        xml.push_str("<a:normAutofit/>");
    }
    xml.push_str("</a:bodyPr><a:lstStyle/>");

    if text_box.paragraphs.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
    }
    for paragraph in &text_box.paragraphs {
        write_paragraph(xml, paragraph)?;
    }

    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) -> Result<()> {
    xml.push_str("<a:p>");

    let level = i64::from(paragraph.level);
    let (margin, indent) = match paragraph.bullet {
        Bullet::Char(_) => (LEVEL_INDENT * level + (-HANGING_INDENT), HANGING_INDENT),
        Bullet::None => (LEVEL_INDENT * level, 0),
    };
    write!(xml, r#"<a:pPr lvl="{}" marL="{}" indent="{}""#, paragraph.level, margin, indent)?;
    if paragraph.align == Align::Center {
        xml.push_str(r#" algn="ctr""#);
    }
    xml.push('>');
    if let Some(points) = paragraph.space_after {
        write!(xml, r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#, points * 100)?;
    }
    match paragraph.bullet {
        Bullet::Char(c) => {
            let glyph = c.to_string();
            write!(xml, r#"<a:buFont typeface="Arial"/><a:buChar char="{}"/>"#, escape(glyph.as_str()))?;
        }
        Bullet::None => xml.push_str("<a:buNone/>"),
    }
    xml.push_str("</a:pPr>");

    for run in &paragraph.runs {
        write!(xml, r#"<a:r><a:rPr lang="en-US" sz="{}""#, run.style.size * 100)?;
        if run.style.bold {
            xml.push_str(r#" b="1""#);
        }
        if run.style.italic {
            xml.push_str(r#" i="1""#);
        }
        write!(
            xml,
            r#" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r>"#,
            run.style.color,
            escape(run.text.as_str())
        )?;
    }

    xml.push_str("</a:p>");
    Ok(())
}

fn write_picture(xml: &mut String, shape_id: usize, picture: &Picture, rel_id: &str) -> Result<()> {
    xml.push_str("<p:pic><p:nvPicPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
        shape_id,
        shape_id,
        escape(picture.description.as_str())
    )?;
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
    write!(
        xml,
        r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
        rel_id
    )?;
    xml.push_str("<p:spPr>");
    write_frame(xml, &picture.frame)?;
    xml.push_str("</p:spPr></p:pic>");
    Ok(())
}

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles></p:sldMaster>"#;

const SLIDE_MASTER_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const SLIDE_LAYOUT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#;
