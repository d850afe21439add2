//! Small encoded assets for tests.

use std::io::Cursor;

use image::{ImageFormat, ImageResult, Rgba, RgbaImage};

/// Color of the pixel at (0, 0) in [`png_bytes`].
pub const PNG_ORIGIN_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Name of the clip in [`glb`] when animated.
pub const ANIMATION_NAME: &str = "Wave";

/// Length in seconds of [`ANIMATION_NAME`].
pub const ANIMATION_DURATION: f32 = 1.5;

/// Encode a `width` x `height` checkerboard PNG.
///
/// Even cells are [`PNG_ORIGIN_COLOR`], odd cells opaque white.
pub fn png_bytes(width: u32, height: u32) -> ImageResult<Vec<u8>> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba(PNG_ORIGIN_COLOR)
        } else {
            Rgba([255, 255, 255, 255])
        }
    });

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// A binary glTF with a `Body` node holding a `Head` child.
///
/// With `with_animation`, the file also carries one clip translating `Head`
/// from t=0 to t=[`ANIMATION_DURATION`].
pub fn glb(with_animation: bool) -> Vec<u8> {
    let (json, bin) = if with_animation {
        (animated_json(), animation_buffer())
    } else {
        (STATIC_JSON.to_string(), Vec::new())
    };
    encode_glb(&json, &bin)
}

const STATIC_JSON: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [ { "nodes": [0] } ],
    "nodes": [
        { "name": "Body", "children": [1] },
        { "name": "Head", "translation": [0.0, 1.0, 0.0] }
    ]
}"#;

fn animated_json() -> String {
    format!(
        r#"{{
    "asset": {{ "version": "2.0" }},
    "scene": 0,
    "scenes": [ {{ "nodes": [0] }} ],
    "nodes": [
        {{ "name": "Body", "children": [1] }},
        {{ "name": "Head", "translation": [0.0, 1.0, 0.0] }}
    ],
    "buffers": [ {{ "byteLength": 32 }} ],
    "bufferViews": [
        {{ "buffer": 0, "byteOffset": 0, "byteLength": 8 }},
        {{ "buffer": 0, "byteOffset": 8, "byteLength": 24 }}
    ],
    "accessors": [
        {{ "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [{duration:.1}] }},
        {{ "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" }}
    ],
    "animations": [ {{
        "name": "{name}",
        "channels": [ {{ "sampler": 0, "target": {{ "node": 1, "path": "translation" }} }} ],
        "samplers": [ {{ "input": 0, "output": 1, "interpolation": "LINEAR" }} ]
    }} ]
}}"#,
        duration = ANIMATION_DURATION,
        name = ANIMATION_NAME,
    )
}

fn animation_buffer() -> Vec<u8> {
    let floats: [f32; 8] = [
        // Keyframe times
        0.0,
        ANIMATION_DURATION,
        // Head translations
        0.0,
        1.0,
        0.0,
        0.0,
        1.5,
        0.0,
    ];
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

fn encode_glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let mut total = 12 + 8 + json.len();
    if !bin.is_empty() {
        total += 8 + bin.len();
    }

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(GLB_MAGIC);
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());

    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);

    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}
