//! Content stream walker
//!
//! Interprets the subset of operators needed to find text objects, placed
//! raster images and painted paths on a page. Glyph extents are estimated
//! from the font size (half an em per glyph) since no font programs are
//! loaded.

use crate::geometry::{Matrix, Rect};
use crate::objects::{self, as_dict, get_dict, get_name, number, resolve};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;

/// Nesting limit for Form XObjects drawn from other forms
const MAX_FORM_DEPTH: usize = 8;

/// Average glyph advance as a fraction of the font size
const AVG_GLYPH_ADVANCE: f64 = 0.5;

/// Geometry collected from one page's content streams
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    /// Device-space bounds of each text object that showed glyphs
    pub text_blocks: Vec<Rect>,
    /// Device-space bounds of each placed raster image (XObject or inline)
    pub image_placements: Vec<Rect>,
    pub inline_images: usize,
    /// Path-painting operators (`S`, `f`, `B`, ...)
    pub drawing_commands: usize,
    /// Glyph count per text rendering mode (`Tr`)
    pub render_modes: BTreeMap<i64, usize>,
}

impl PageLayout {
    /// Glyphs shown in any rendering mode
    pub fn glyph_count(&self) -> usize {
        self.render_modes.values().sum()
    }
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    ctm: Matrix,
    font_size: f64,
    composite_font: bool,
    leading: f64,
    horizontal_scale: f64,
    render_mode: i64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font_size: 0.0,
            composite_font: false,
            leading: 0.0,
            horizontal_scale: 1.0,
            render_mode: 0,
        }
    }
}

struct TextObject {
    tm: Matrix,
    tlm: Matrix,
    bounds: Option<Rect>,
}

impl TextObject {
    fn new() -> Self {
        Self {
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            bounds: None,
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.tlm = Matrix::translate(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }
}

/// Interpreter state carried across the pieces of a split content stream
struct Frame {
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text: Option<TextObject>,
}

impl Frame {
    fn new(state: GraphicsState) -> Self {
        Self {
            state,
            stack: Vec::new(),
            text: None,
        }
    }
}

/// Walk every content stream of a page and collect its layout
pub fn walk_page(doc: &Document, page_id: ObjectId) -> PageLayout {
    let mut walker = Walker {
        doc,
        layout: PageLayout::default(),
    };

    let content = match doc.get_page_content(page_id) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Could not read content of page {:?}: {}", page_id, e);
            return walker.layout;
        }
    };

    let resources = doc
        .get_object(page_id)
        .ok()
        .and_then(as_dict)
        .and_then(|page| objects::inherited(doc, page, b"Resources"))
        .and_then(as_dict);

    walker.run_stream(&content, resources, GraphicsState::default(), 0);
    walker.layout
}

struct Walker<'a> {
    doc: &'a Document,
    layout: PageLayout,
}

impl<'a> Walker<'a> {
    fn run_stream(
        &mut self,
        bytes: &[u8],
        resources: Option<&'a Dictionary>,
        state: GraphicsState,
        depth: usize,
    ) {
        let mut frame = Frame::new(state);

        for segment in split_inline_images(bytes) {
            match segment {
                Segment::Operators(chunk) => match Content::decode(chunk) {
                    Ok(content) => self.run(&content.operations, resources, &mut frame, depth),
                    Err(e) => tracing::warn!("Could not decode content stream: {}", e),
                },
                Segment::InlineImage => {
                    self.layout.inline_images += 1;
                    self.layout
                        .image_placements
                        .push(frame.state.ctm.transform_rect(&Rect::unit()));
                }
            }
        }

        // Unterminated text object at end of stream
        if let Some(bounds) = frame.text.and_then(|t| t.bounds) {
            self.layout.text_blocks.push(bounds);
        }
    }

    fn run(
        &mut self,
        operations: &[Operation],
        resources: Option<&'a Dictionary>,
        frame: &mut Frame,
        depth: usize,
    ) {
        let Frame { state, stack, text } = frame;

        for op in operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => stack.push(*state),
                "Q" => {
                    if let Some(saved) = stack.pop() {
                        *state = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operand(operands) {
                        state.ctm = m.then(&state.ctm);
                    }
                }
                "BT" => *text = Some(TextObject::new()),
                "ET" => {
                    if let Some(bounds) = text.take().and_then(|t| t.bounds) {
                        self.layout.text_blocks.push(bounds);
                    }
                }
                "Tf" => {
                    if let Some(size) = operands.get(1).and_then(number) {
                        state.font_size = size;
                    }
                    state.composite_font = operands
                        .first()
                        .and_then(objects::name)
                        .map(|font| self.is_composite_font(resources, &font))
                        .unwrap_or(false);
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(number) {
                        state.leading = leading;
                    }
                }
                "Tz" => {
                    if let Some(scale) = operands.first().and_then(number) {
                        state.horizontal_scale = scale / 100.0;
                    }
                }
                "Tr" => {
                    if let Some(mode) = operands.first().and_then(number) {
                        state.render_mode = mode as i64;
                    }
                }
                "Td" | "TD" => {
                    if let (Some(t), [tx, ty, ..]) = (text.as_mut(), numbers(operands).as_slice())
                    {
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        t.move_line(*tx, *ty);
                    }
                }
                "Tm" => {
                    if let (Some(t), Some(m)) = (text.as_mut(), matrix_operand(operands)) {
                        t.tm = m;
                        t.tlm = m;
                    }
                }
                "T*" => {
                    if let Some(t) = text.as_mut() {
                        t.move_line(0.0, -state.leading);
                    }
                }
                "Tj" => {
                    if let Some(t) = text.as_mut() {
                        if let Some(Object::String(bytes, _)) = operands.first() {
                            self.show(t, state, bytes);
                        }
                    }
                }
                "'" | "\"" => {
                    if let Some(t) = text.as_mut() {
                        t.move_line(0.0, -state.leading);
                        if let Some(Object::String(bytes, _)) = operands.last() {
                            self.show(t, state, bytes);
                        }
                    }
                }
                "TJ" => {
                    if let (Some(t), Some(Object::Array(items))) = (text.as_mut(), operands.first())
                    {
                        for item in items {
                            match item {
                                Object::String(bytes, _) => self.show(t, state, bytes),
                                other => {
                                    if let Some(adjust) = number(other) {
                                        let tx = -adjust / 1000.0
                                            * state.font_size
                                            * state.horizontal_scale;
                                        t.tm = Matrix::translate(tx, 0.0).then(&t.tm);
                                    }
                                }
                            }
                        }
                    }
                }
                "Do" => {
                    if let Some(name) = operands.first().and_then(objects::name) {
                        self.draw_xobject(resources, &name, state, depth);
                    }
                }
                "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                    self.layout.drawing_commands += 1;
                }
                _ => {}
            }
        }
    }

    fn show(&mut self, text: &mut TextObject, state: &GraphicsState, bytes: &[u8]) {
        let bytes_per_glyph = if state.composite_font { 2 } else { 1 };
        let glyphs = bytes.len() / bytes_per_glyph;
        if glyphs == 0 {
            return;
        }

        let advance =
            glyphs as f64 * AVG_GLYPH_ADVANCE * state.font_size * state.horizontal_scale;
        let run = Rect::new(0.0, 0.0, advance, state.font_size);
        let device = text.tm.then(&state.ctm).transform_rect(&run);

        text.bounds = Some(match text.bounds {
            Some(bounds) => bounds.union(&device),
            None => device,
        });
        text.tm = Matrix::translate(advance, 0.0).then(&text.tm);

        *self.layout.render_modes.entry(state.render_mode).or_insert(0) += glyphs;
    }

    fn draw_xobject(
        &mut self,
        resources: Option<&'a Dictionary>,
        name: &str,
        state: &GraphicsState,
        depth: usize,
    ) {
        let doc = self.doc;
        let Some(stream) = resources
            .and_then(|res| get_dict(doc, res, b"XObject"))
            .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
            .map(|obj| resolve(doc, obj))
            .and_then(|obj| obj.as_stream().ok())
        else {
            return;
        };

        match get_name(doc, &stream.dict, b"Subtype").as_deref() {
            Some("Image") => {
                self.layout
                    .image_placements
                    .push(state.ctm.transform_rect(&Rect::unit()));
            }
            Some("Form") if depth < MAX_FORM_DEPTH => {
                let form_matrix = stream
                    .dict
                    .get(b"Matrix")
                    .ok()
                    .and_then(|m| match resolve(doc, m) {
                        Object::Array(items) => matrix_operand(items),
                        _ => None,
                    })
                    .unwrap_or(Matrix::IDENTITY);
                let form_resources = get_dict(doc, &stream.dict, b"Resources").or(resources);
                let content = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());

                let mut form_state = *state;
                form_state.ctm = form_matrix.then(&state.ctm);
                self.run_stream(&content, form_resources, form_state, depth + 1);
            }
            _ => {}
        }
    }

    fn is_composite_font(&self, resources: Option<&'a Dictionary>, font: &str) -> bool {
        let doc = self.doc;
        resources
            .and_then(|res| get_dict(doc, res, b"Font"))
            .and_then(|fonts| get_dict(doc, fonts, font.as_bytes()))
            .and_then(|dict| get_name(doc, dict, b"Subtype"))
            .map(|subtype| subtype == "Type0")
            .unwrap_or(false)
    }
}

fn numbers(operands: &[Object]) -> Vec<f64> {
    operands.iter().filter_map(number).collect()
}

fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    match numbers(operands).as_slice() {
        [a, b, c, d, e, f] => Some(Matrix::new(*a, *b, *c, *d, *e, *f)),
        _ => None,
    }
}

/// A piece of a content stream once inline images are cut out
#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Operators(&'a [u8]),
    InlineImage,
}

/// Cut every `BI ... ID <data> EI` section out of a content stream.
///
/// Inline image data is raw binary and stops the operator parser, so each
/// image becomes its own segment and the operators around it are decoded
/// separately. A `BI` without a matching `ID`/`EI` is left in place.
fn split_inline_images(bytes: &[u8]) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut lexer = Lexer { bytes, pos: 0 };
    let mut start = 0;

    while let Some((token_start, token)) = lexer.next_token() {
        if token != b"BI" {
            continue;
        }
        let Some(end) = lexer.skip_inline_image() else {
            break;
        };
        if token_start > start {
            segments.push(Segment::Operators(&bytes[start..token_start]));
        }
        segments.push(Segment::InlineImage);
        start = end;
    }

    if start < bytes.len() {
        segments.push(Segment::Operators(&bytes[start..]));
    }
    segments
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(byte: u8) -> bool {
    !is_whitespace(byte) && !is_delimiter(byte)
}

/// Just enough of a tokenizer to find bare operator keywords
struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Next bare keyword or number with its start offset. Strings, names,
    /// comments and punctuation are skipped.
    fn next_token(&mut self) -> Option<(usize, &'a [u8])> {
        let bytes = self.bytes;
        while self.pos < bytes.len() {
            let byte = bytes[self.pos];
            match byte {
                b if is_whitespace(b) => self.pos += 1,
                b'%' => {
                    while self.pos < bytes.len() && !matches!(bytes[self.pos], b'\r' | b'\n') {
                        self.pos += 1;
                    }
                }
                b'(' => self.skip_literal_string(),
                b'<' if bytes.get(self.pos + 1) == Some(&b'<') => self.pos += 2,
                b'<' => {
                    while self.pos < bytes.len() && bytes[self.pos] != b'>' {
                        self.pos += 1;
                    }
                    self.pos += 1;
                }
                b'/' => {
                    self.pos += 1;
                    self.skip_regular();
                }
                b if is_delimiter(b) => self.pos += 1,
                _ => {
                    let start = self.pos;
                    self.skip_regular();
                    return Some((start, &bytes[start..self.pos]));
                }
            }
        }
        None
    }

    fn skip_regular(&mut self) {
        while self.pos < self.bytes.len() && is_regular(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    fn skip_literal_string(&mut self) {
        let bytes = self.bytes;
        let mut depth = 0usize;
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\\' => self.pos += 1,
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Skip the image dictionary and data following `BI`, returning the
    /// offset just past `EI`.
    fn skip_inline_image(&mut self) -> Option<usize> {
        loop {
            let (_, token) = self.next_token()?;
            if token == b"ID" {
                break;
            }
        }

        // One whitespace byte separates ID from the data
        let data_start = (self.pos + 1).min(self.bytes.len());
        let bytes = self.bytes;
        let end = (data_start..bytes.len().saturating_sub(1)).find(|&i| {
            bytes[i] == b'E'
                && bytes[i + 1] == b'I'
                && (i == data_start || is_whitespace(bytes[i - 1]))
                && bytes.get(i + 2).map_or(true, |&next| !is_regular(next))
        })? + 2;

        self.pos = end;
        Some(end)
    }
}
