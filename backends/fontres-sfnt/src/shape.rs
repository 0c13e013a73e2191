// this_file: backends/fontres-sfnt/src/shape.rs

//! OpenType layout with harfrust

use fontres_core::{DriverError, OtfFeature, OtfSpec, OtfTag, ShapedGlyph};
use harfrust::{Feature, FontRef as HrFontRef, Script, ShaperData, Tag, UnicodeBuffer};

use crate::metrics::SfntFont;

/// Maps an OpenType script tag (`latn`) to its ISO 15924 form (`Latn`)
fn iso15924(tag: OtfTag) -> Option<Tag> {
    if tag == OtfTag::DEFAULT_SCRIPT {
        return None;
    }
    let mut bytes = *tag.as_bytes();
    bytes[0] = bytes[0].to_ascii_uppercase();
    Some(Tag::new(&bytes))
}

fn feature(f: &OtfFeature) -> Feature {
    Feature {
        tag: Tag::new(f.tag.as_bytes()),
        value: u32::from(f.enabled),
        start: 0,
        end: u32::MAX,
    }
}

/// Shapes `text`, applying the GSUB and GPOS features of `spec`
pub fn shape(font: &SfntFont, text: &str, spec: &OtfSpec) -> Result<Vec<ShapedGlyph>, DriverError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let face = font.face();
    let hr_font = HrFontRef::from_index(face.data(), face.index())
        .map_err(|err| DriverError::InvalidFont(format!("{}: {err}", face.origin())))?;
    let shaper_data = ShaperData::new(&hr_font);
    let shaper = shaper_data
        .shaper(&hr_font)
        .point_size(Some(font.pixel_size() as f32))
        .build();

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    if let Some(script) = spec
        .script
        .and_then(iso15924)
        .and_then(Script::from_iso15924_tag)
    {
        buffer.set_script(script);
    }
    buffer.guess_segment_properties();

    let features: Vec<Feature> = spec.gsub.iter().chain(spec.gpos.iter()).map(feature).collect();
    let output = shaper.shape(buffer, &features);

    let scale = font.scale();
    let glyphs = output
        .glyph_infos()
        .iter()
        .zip(output.glyph_positions())
        .map(|(info, pos)| ShapedGlyph {
            glyph: info.glyph_id,
            cluster: info.cluster,
            x_advance: pos.x_advance as f32 * scale,
            x_offset: pos.x_offset as f32 * scale,
            y_offset: pos.y_offset as f32 * scale,
        })
        .collect();
    Ok(glyphs)
}
