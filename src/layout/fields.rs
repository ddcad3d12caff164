use crate::{
    foundation::core::TextAlign,
    layout::text::{FontSpec, TextMeasurer},
    model::field::Field,
};

/// A measured label/value block.
///
/// The label sits on top of the value; both share `width` and `align`.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldLayout {
    pub label: Option<String>,
    pub value: String,
    pub label_font: FontSpec,
    pub value_font: FontSpec,
    pub align: TextAlign,
    pub width: f64,
    pub label_height: f64,
    pub value_height: f64,
}

impl FieldLayout {
    /// Measure `field` at its natural width, capped to `max_width`.
    pub fn new<M: TextMeasurer + ?Sized>(
        measurer: &mut M,
        field: &Field,
        label_font: FontSpec,
        value_font: FontSpec,
        align: TextAlign,
        max_width: f64,
    ) -> Self {
        let label = field.label.clone().filter(|l| !l.is_empty());
        let label_w = label
            .as_deref()
            .map(|l| measurer.measure(l, &label_font, None).width)
            .unwrap_or(0.0);
        let value_w = measurer.measure(&field.value, &value_font, None).width;

        let layout = Self {
            label,
            value: field.value.clone(),
            label_font,
            value_font,
            align,
            width: 0.0,
            label_height: 0.0,
            value_height: 0.0,
        };
        layout.with_width(measurer, label_w.max(value_w).min(max_width))
    }

    /// Re-measure both lines wrapped at `width`.
    pub fn with_width<M: TextMeasurer + ?Sized>(mut self, measurer: &mut M, width: f64) -> Self {
        let width = width.max(0.0);
        self.width = width;
        self.label_height = self
            .label
            .as_deref()
            .map(|l| measurer.measure(l, &self.label_font, Some(width)).height)
            .unwrap_or(0.0);
        self.value_height = measurer
            .measure(&self.value, &self.value_font, Some(width))
            .height;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn height(&self) -> f64 {
        self.label_height + self.value_height
    }
}

/// Field indices grouped into rows, with one inter-field spacing per row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackedRows {
    pub rows: Vec<Vec<usize>>,
    pub spacing: Vec<f64>,
}

/// Greedy left-to-right packing of `widths` into rows of `max_row_width`.
///
/// A field joins the current row while `acc + w + len * margin < max_row_width`.
/// Spacing spreads the leftover width between the fields of a row; single-field
/// rows get zero. A field that does not fit even alone still gets its own row.
pub fn pack_rows(widths: &[f64], max_row_width: f64, margin: f64) -> PackedRows {
    let mut out = PackedRows::default();
    let mut row: Vec<usize> = Vec::new();
    let mut acc = 0.0f64;

    let close = |out: &mut PackedRows, row: Vec<usize>, acc: f64| {
        let spacing = if row.len() > 1 {
            (max_row_width - acc) / (row.len() - 1) as f64
        } else {
            0.0
        };
        out.rows.push(row);
        out.spacing.push(spacing);
    };

    for (idx, &w) in widths.iter().enumerate() {
        if row.is_empty() || acc + w + row.len() as f64 * margin < max_row_width {
            row.push(idx);
            acc += w;
            continue;
        }
        close(&mut out, std::mem::take(&mut row), acc);
        row.push(idx);
        acc = w;
    }
    if !row.is_empty() {
        close(&mut out, row, acc);
    }
    out
}

/// Alignment of the field at `index` in a row of `len` fields.
pub fn row_alignment(index: usize, len: usize) -> TextAlign {
    if index == 0 {
        TextAlign::Left
    } else if index + 1 == len {
        TextAlign::Right
    } else {
        TextAlign::Center
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldRow {
    pub fields: Vec<FieldLayout>,
    pub spacing: f64,
}

impl FieldRow {
    /// Height of the tallest field.
    pub fn height(&self) -> f64 {
        self.fields.iter().map(FieldLayout::height).fold(0.0, f64::max)
    }

    /// Horizontal offset of each field from the row origin.
    pub fn offsets(&self) -> impl Iterator<Item = f64> + '_ {
        self.fields.iter().scan(0.0, move |x, f| {
            let at = *x;
            *x += f.width + self.spacing;
            Some(at)
        })
    }
}

/// Measure, pack and align `fields` into rows.
pub fn layout_rows<M: TextMeasurer + ?Sized>(
    measurer: &mut M,
    fields: &[Field],
    label_font: FontSpec,
    value_font: FontSpec,
    max_row_width: f64,
    margin: f64,
) -> Vec<FieldRow> {
    let layouts: Vec<FieldLayout> = fields
        .iter()
        .map(|f| {
            FieldLayout::new(
                &mut *measurer,
                f,
                label_font,
                value_font,
                TextAlign::Left,
                max_row_width,
            )
        })
        .collect();
    let widths: Vec<f64> = layouts.iter().map(|l| l.width).collect();
    let packed = pack_rows(&widths, max_row_width, margin);

    packed
        .rows
        .iter()
        .zip(packed.spacing)
        .map(|(row, spacing)| {
            let len = row.len();
            let fields = row
                .iter()
                .enumerate()
                .map(|(pos, &idx)| layouts[idx].clone().with_align(row_alignment(pos, len)))
                .collect();
            FieldRow { fields, spacing }
        })
        .collect()
}

/// How a packed block advances the vertical cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAdvance {
    /// Sum of row heights plus the gaps between rows, then `margin`.
    #[default]
    Summed,
    /// Last row height times row count, then `margin`.
    LastRowTimesCount,
}

impl RowAdvance {
    pub fn block_advance(self, rows: &[FieldRow], row_gap: f64, margin: f64) -> f64 {
        match self {
            Self::Summed => {
                let heights: f64 = rows.iter().map(FieldRow::height).sum();
                let gaps = rows.len().saturating_sub(1) as f64 * row_gap;
                heights + gaps + margin
            }
            Self::LastRowTimesCount => {
                let last = rows.last().map(FieldRow::height).unwrap_or(0.0);
                last * rows.len() as f64 + margin
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fields.rs"]
mod tests;
