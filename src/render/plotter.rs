use crate::{
    foundation::core::{Point, Rect, Rgb8, TextAlign},
    foundation::error::PassError,
    layout::fields::{FieldLayout, layout_rows},
    layout::text::{FontSpec, TextMeasurer},
    model::field::Field,
    model::flat::FlatPass,
    model::pass::{ImageRef, Pass},
    model::style::StyleKind,
    render::barcode::{BarcodeEncoder, BarcodeRegion, barcode_region},
    render::command::DrawCommand,
    render::config::{PrimaryLayout, RenderConfig, SecondaryLayout},
};

/// What to render: a decoded wallet pass or a flat non-container pass.
#[derive(Clone, Copy, Debug)]
pub enum PassSource<'p> {
    Wallet(&'p Pass<'p>),
    Flat(&'p FlatPass<'p>),
}

impl PassSource<'_> {
    /// `None` for flat passes.
    pub fn style_kind(&self) -> Option<StyleKind> {
        match self {
            Self::Wallet(pass) => Some(pass.style_kind()),
            Self::Flat(_) => None,
        }
    }
}

impl<'p> From<&'p Pass<'p>> for PassSource<'p> {
    fn from(pass: &'p Pass<'p>) -> Self {
        Self::Wallet(pass)
    }
}

impl<'p> From<&'p FlatPass<'p>> for PassSource<'p> {
    fn from(pass: &'p FlatPass<'p>) -> Self {
        Self::Flat(pass)
    }
}

/// Draw list for the front of one pass.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderedPass {
    pub width: f64,
    pub height: f64,
    pub style: Option<StyleKind>,
    /// Back-to-front draw order.
    pub commands: Vec<DrawCommand>,
    pub barcode: Option<BarcodeRegion>,
    /// Sections left out because their layout preconditions failed.
    pub skipped: Vec<String>,
}

impl RenderedPass {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(DrawCommand::text)
    }

    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(DrawCommand::image_name)
    }
}

/// Lay out the front of a pass as draw commands, top to bottom.
///
/// Stateless: the same source, measurer behavior and config always produce the
/// same output. A section whose preconditions fail is left out and listed in
/// [`RenderedPass::skipped`].
#[tracing::instrument(skip_all, fields(style = ?source.style_kind()))]
pub fn render<M, E>(
    source: PassSource<'_>,
    measurer: &mut M,
    encoder: &E,
    cfg: &RenderConfig,
) -> RenderedPass
where
    M: TextMeasurer + ?Sized,
    E: BarcodeEncoder + ?Sized,
{
    let (commands, skipped, barcode) = match source {
        PassSource::Wallet(pass) => {
            let label = pass.label_color().unwrap_or(cfg.colors.label);
            let value = pass.foreground_color().unwrap_or(cfg.colors.foreground);
            let mut p = Plotter::new(measurer, cfg, label, value);
            plot_wallet(&mut p, pass);
            let barcode = barcode_region(pass.barcode_candidates(), encoder, cfg);
            (p.commands, p.skipped, barcode)
        }
        PassSource::Flat(flat) => {
            let mut p = Plotter::new(measurer, cfg, Rgb8::BLACK, Rgb8::BLACK);
            plot_flat(&mut p, flat);
            let barcode = barcode_region(flat.barcode.iter(), encoder, cfg);
            (p.commands, p.skipped, barcode)
        }
    };

    tracing::debug!(
        commands = commands.len(),
        skipped = skipped.len(),
        barcode = barcode.is_some(),
        "rendered pass"
    );
    RenderedPass {
        width: cfg.width,
        height: cfg.height,
        style: source.style_kind(),
        commands,
        barcode,
        skipped,
    }
}

fn plot_wallet<M: TextMeasurer + ?Sized>(p: &mut Plotter<'_, M>, pass: &Pass<'_>) {
    let profile = *p.cfg.profile(pass.style_kind());

    p.background(pass);
    p.header(pass.logo, pass.logo_text.as_deref(), &pass.header_fields);

    let primary_font = p.cfg.fonts.get(profile.primary_value_font);
    match profile.primary {
        PrimaryLayout::OriginDestination => {
            p.origin_destination(&pass.primary_fields, primary_font)
        }
        PrimaryLayout::StripAndLead { strip_max_height } => {
            let strip = pass.strip.filter(|_| pass.background.is_none());
            p.strip_and_lead(strip, strip_max_height, &pass.primary_fields, primary_font);
        }
        PrimaryLayout::Lead => p.lead(&pass.primary_fields, primary_font),
    }

    match profile.secondary {
        SecondaryLayout::AuxiliaryThenSecondary => {
            p.field_block(&pass.auxiliary_fields);
            p.field_block(&pass.secondary_fields);
        }
        SecondaryLayout::Combined => {
            let combined: Vec<Field> = pass
                .secondary_fields
                .iter()
                .chain(&pass.auxiliary_fields)
                .cloned()
                .collect();
            p.field_block(&combined);
        }
    }
}

fn plot_flat<M: TextMeasurer + ?Sized>(p: &mut Plotter<'_, M>, flat: &FlatPass<'_>) {
    let cfg = p.cfg;
    p.fill(Rect::new(0.0, 0.0, cfg.width, cfg.height), Rgb8::WHITE);
    if let Some(accent) = flat.accent_color {
        let band = cfg.header_height + 2.0 * cfg.margin;
        p.fill(Rect::new(0.0, 0.0, cfg.width, band), accent);
    }
    p.header(flat.icon, None, &[]);
    p.field_block(&flat.fields);
}

struct Plotter<'r, M: ?Sized> {
    measurer: &'r mut M,
    cfg: &'r RenderConfig,
    /// Top of the next section.
    y: f64,
    label_color: Rgb8,
    value_color: Rgb8,
    commands: Vec<DrawCommand>,
    skipped: Vec<String>,
}

impl<'r, M: TextMeasurer + ?Sized> Plotter<'r, M> {
    fn new(
        measurer: &'r mut M,
        cfg: &'r RenderConfig,
        label_color: Rgb8,
        value_color: Rgb8,
    ) -> Self {
        Self {
            measurer,
            cfg,
            y: 0.0,
            label_color,
            value_color,
            commands: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    fn skip(&mut self, section: &str, err: PassError) {
        tracing::warn!(section, error = %err, "section skipped");
        self.skipped.push(format!("{section}: {err}"));
    }

    fn fill(&mut self, rect: Rect, color: Rgb8) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn image(
        &mut self,
        image: ImageRef<'_>,
        rect: Rect,
        clip: Option<Rect>,
        blur_radius: Option<f64>,
    ) {
        self.commands.push(DrawCommand::Image {
            name: image.name.to_string(),
            rect,
            clip,
            blur_radius,
        });
    }

    fn field(&mut self, layout: &FieldLayout, origin: Point) {
        let Point { x, y } = origin;
        if let Some(label) = &layout.label {
            self.commands.push(DrawCommand::Text {
                rect: Rect::new(x, y, x + layout.width, y + layout.label_height),
                text: label.clone(),
                font: layout.label_font,
                color: self.label_color,
                align: layout.align,
            });
        }
        let top = y + layout.label_height;
        self.commands.push(DrawCommand::Text {
            rect: Rect::new(x, top, x + layout.width, top + layout.value_height),
            text: layout.value.clone(),
            font: layout.value_font,
            color: self.value_color,
            align: layout.align,
        });
    }

    fn measure_field(
        &mut self,
        field: &Field,
        value_font: FontSpec,
        align: TextAlign,
    ) -> FieldLayout {
        FieldLayout::new(
            &mut *self.measurer,
            field,
            self.cfg.fonts.label,
            value_font,
            align,
            self.cfg.content_width(),
        )
    }

    fn background(&mut self, pass: &Pass<'_>) {
        let cfg = self.cfg;
        let blurred = pass
            .background
            .filter(|_| pass.strip.is_none() && pass.style_kind().supports_background());
        match blurred {
            Some(image) => {
                let r = cfg.background_blur_radius;
                let rect = Rect::new(-r, -r, cfg.width + r, cfg.height + r);
                self.image(image, rect, None, Some(r));
            }
            None => {
                let color = pass.background_color().unwrap_or(cfg.colors.background);
                self.fill(Rect::new(0.0, 0.0, cfg.width, cfg.height), color);
            }
        }
    }

    /// Logo scaled to the header height, optional logo text, then header fields
    /// packed right to left.
    fn header(&mut self, logo: Option<ImageRef<'_>>, logo_text: Option<&str>, fields: &[Field]) {
        let cfg = self.cfg;
        let (m, hh) = (cfg.margin, cfg.header_height);
        let top = self.y + m;

        let mut text_x = m;
        if let Some(logo) = logo.filter(|l| l.image.height > 0) {
            let w = f64::from(logo.image.width) * hh / f64::from(logo.image.height);
            self.image(logo, Rect::new(m, top, m + w, top + hh), None, None);
            text_x += w + m;
        }

        if let Some(text) = logo_text.filter(|t| !t.is_empty()) {
            let font = cfg.fonts.big_value;
            let room = (cfg.width - m - text_x).max(0.0);
            let extent = self.measurer.measure(text, &font, Some(room));
            let y = top + ((hh - extent.height) / 2.0).max(0.0);
            self.commands.push(DrawCommand::Text {
                rect: Rect::new(text_x, y, text_x + extent.width.min(room), y + extent.height),
                text: text.to_string(),
                font,
                color: self.value_color,
                align: TextAlign::Left,
            });
        }

        let mut right_edge = cfg.width - m;
        for field in fields {
            if right_edge <= 0.0 {
                self.skip(
                    &format!("header field '{}'", field.key),
                    PassError::layout("no horizontal room left in the header"),
                );
                continue;
            }
            let layout = self.measure_field(field, cfg.fonts.value, TextAlign::Right);
            let natural = layout.width;
            let layout = layout.with_width(&mut *self.measurer, right_edge);
            self.field(&layout, Point::new(0.0, top));
            right_edge -= natural + m;
        }

        self.advance(hh + 3.0 * m);
    }

    fn origin_destination(&mut self, fields: &[Field], value_font: FontSpec) {
        let [origin, destination, ..] = fields else {
            self.skip(
                "primary fields",
                PassError::layout(format!(
                    "boarding pass needs origin and destination fields, found {}",
                    fields.len()
                )),
            );
            return;
        };
        let cfg = self.cfg;
        let at = Point::new(cfg.margin, self.y);

        let origin = self.measure_field(origin, value_font, TextAlign::Left);
        let destination = self
            .measure_field(destination, value_font, TextAlign::Right)
            .with_width(&mut *self.measurer, cfg.content_width());
        self.field(&origin, at);
        self.field(&destination, at);

        self.advance(origin.height().max(destination.height()) + 2.0 * cfg.margin);
    }

    fn strip_and_lead(
        &mut self,
        strip: Option<ImageRef<'_>>,
        strip_max_height: f64,
        fields: &[Field],
        value_font: FontSpec,
    ) {
        let cfg = self.cfg;

        let mut strip_height = 0.0;
        if let Some(strip) = strip.filter(|s| s.image.width > 0) {
            let full = f64::from(strip.image.height) * cfg.width / f64::from(strip.image.width);
            strip_height = full.min(strip_max_height);
            let top = self.y - cfg.margin;
            self.image(
                strip,
                Rect::new(0.0, top, cfg.width, top + full),
                Some(Rect::new(0.0, top, cfg.width, top + strip_height)),
                None,
            );
        }

        let field_height = match fields.first() {
            Some(first) => {
                let layout = self.measure_field(first, value_font, TextAlign::Left);
                self.field(&layout, Point::new(cfg.margin, self.y));
                Some(layout.height())
            }
            None => None,
        };

        let dy = match field_height {
            Some(h) if h >= strip_height => h + 2.0 * cfg.margin,
            _ => strip_height,
        };
        self.advance(dy);
    }

    fn lead(&mut self, fields: &[Field], value_font: FontSpec) {
        let Some(first) = fields.first() else {
            return;
        };
        let layout = self.measure_field(first, value_font, TextAlign::Left);
        self.field(&layout, Point::new(self.cfg.margin, self.y));
        self.advance(layout.height() + 2.0 * self.cfg.margin);
    }

    fn field_block(&mut self, fields: &[Field]) {
        let cfg = self.cfg;
        let rows = layout_rows(
            &mut *self.measurer,
            fields,
            cfg.fonts.label,
            cfg.fonts.value,
            cfg.content_width(),
            cfg.margin,
        );

        let mut row_y = self.y;
        for row in &rows {
            for (layout, dx) in row.fields.iter().zip(row.offsets()) {
                self.field(layout, Point::new(cfg.margin + dx, row_y));
            }
            row_y += row.height() + cfg.row_gap;
        }

        self.advance(cfg.row_advance.block_advance(&rows, cfg.row_gap, cfg.margin));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plotter.rs"]
mod tests;
