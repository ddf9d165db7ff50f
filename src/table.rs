use crate::error::LogoTableError;
use crate::font::FontRole;
use crate::logo::LogoGraphic;

/// The seven fixed columns of the summary table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Identifier,
    MotifGraphic,
    Seed,
    PValue,
    SeedAbundance,
    TraceGraphic,
    MotifAbundance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Text,
    Numeric,
    Graphic,
}

impl Column {
    pub const COUNT: usize = 7;

    pub const ALL: [Column; Column::COUNT] = [
        Column::Identifier,
        Column::MotifGraphic,
        Column::Seed,
        Column::PValue,
        Column::SeedAbundance,
        Column::TraceGraphic,
        Column::MotifAbundance,
    ];

    /// Header label. Header cells are always text, whatever the column's
    /// data kind is.
    pub fn label(self) -> &'static str {
        match self {
            Column::Identifier => "ID",
            Column::MotifGraphic => "Motif Profile",
            Column::Seed => "Seed",
            Column::PValue => "Seed P-value",
            Column::SeedAbundance => "Seed Freq.",
            Column::TraceGraphic => "K-context Trace",
            Column::MotifAbundance => "Motif Freq.",
        }
    }

    pub fn kind(self) -> CellKind {
        match self {
            Column::Identifier | Column::Seed => CellKind::Text,
            Column::PValue | Column::SeedAbundance | Column::MotifAbundance => CellKind::Numeric,
            Column::MotifGraphic | Column::TraceGraphic => CellKind::Graphic,
        }
    }

    // Short labels in these columns sit next to wide logo bands; the extra
    // left padding keeps them from hugging the previous column.
    pub(crate) fn text_left_padded(self) -> bool {
        matches!(self, Column::Identifier | Column::TraceGraphic)
    }
}

/// One data row. Ordinals are 1-based and assigned by the model in
/// presentation order.
pub struct MotifRow {
    pub(crate) ordinal: usize,
    pub(crate) motif: Box<dyn LogoGraphic>,
    pub(crate) seed: String,
    pub(crate) p_value: f64,
    pub(crate) seed_abundance: f64,
    pub(crate) trace: Box<dyn LogoGraphic>,
    pub(crate) motif_abundance: f64,
}

/// A cell as seen by the layout and render passes. Text cells carry the
/// exact string that is both measured and painted.
pub enum Cell<'a> {
    Text { text: String, role: FontRole },
    Graphic(&'a dyn LogoGraphic),
}

impl MotifRow {
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn cell(&self, column: Column) -> Cell<'_> {
        match column {
            Column::Identifier => Cell::Text {
                text: format_ordinal(self.ordinal),
                role: FontRole::BoldIdentifier,
            },
            Column::MotifGraphic => Cell::Graphic(self.motif.as_ref()),
            Column::Seed => Cell::Text {
                text: self.seed.clone(),
                role: FontRole::Plain,
            },
            Column::PValue => Cell::Text {
                text: format_p_value(self.p_value),
                role: FontRole::Plain,
            },
            Column::SeedAbundance => Cell::Text {
                text: format_abundance(self.seed_abundance),
                role: FontRole::Plain,
            },
            Column::TraceGraphic => Cell::Graphic(self.trace.as_ref()),
            Column::MotifAbundance => Cell::Text {
                text: format_abundance(self.motif_abundance),
                role: FontRole::Plain,
            },
        }
    }
}

/// Seed p-value: scientific notation, three mantissa decimals, uppercase
/// exponent marker, no plus sign on positive exponents.
pub fn format_p_value(value: f64) -> String {
    format!("{value:.3E}")
}

/// Abundance percentage: fixed two decimals with a literal percent suffix.
pub fn format_abundance(value: f64) -> String {
    format!("{value:.2}%")
}

/// Row identifier: the 1-based ordinal followed by a closing parenthesis.
pub fn format_ordinal(ordinal: usize) -> String {
    format!("{ordinal})")
}

/// The table: a fixed header plus data rows in presentation order. Built
/// once by the caller, then read-only for the layout and render passes.
#[derive(Default)]
pub struct TableModel {
    rows: Vec<MotifRow>,
}

impl TableModel {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Appends one data row. The ordinal is assigned from the row's final
    /// position. Invalid input is rejected here, before any layout work can
    /// observe it.
    pub fn add_row(
        &mut self,
        motif: Box<dyn LogoGraphic>,
        seed: impl Into<String>,
        p_value: f64,
        seed_abundance: f64,
        motif_abundance: f64,
        trace: Box<dyn LogoGraphic>,
    ) -> Result<(), LogoTableError> {
        let seed = seed.into();
        if seed.is_empty() {
            return Err(LogoTableError::MalformedModel(
                "seed string is empty".to_string(),
            ));
        }
        if !p_value.is_finite() || p_value <= 0.0 {
            return Err(LogoTableError::MalformedModel(format!(
                "p-value {p_value} is not a positive finite number"
            )));
        }
        for (name, value) in [
            ("seed abundance", seed_abundance),
            ("motif abundance", motif_abundance),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(LogoTableError::MalformedModel(format!(
                    "{name} {value} is outside 0..=100"
                )));
            }
        }
        if motif.unit_count() == 0 {
            return Err(LogoTableError::MalformedModel(
                "motif graphic has no positions".to_string(),
            ));
        }
        if trace.unit_count() == 0 {
            return Err(LogoTableError::MalformedModel(
                "trace graphic has no positions".to_string(),
            ));
        }
        self.rows.push(MotifRow {
            ordinal: self.rows.len() + 1,
            motif,
            seed,
            p_value,
            seed_abundance,
            trace,
            motif_abundance,
        });
        Ok(())
    }

    pub fn rows(&self) -> &[MotifRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::types::Rect;

    struct StubLogo {
        units: usize,
    }

    impl LogoGraphic for StubLogo {
        fn unit_count(&self) -> usize {
            self.units
        }

        fn paint(&self, _canvas: &mut Canvas, _region: Rect) {}
    }

    fn stub(units: usize) -> Box<dyn LogoGraphic> {
        Box::new(StubLogo { units })
    }

    #[test]
    fn p_value_formatting() {
        assert_eq!(format_p_value(0.0000123), "1.230E-5");
        assert_eq!(format_p_value(1234.0), "1.234E3");
        assert_eq!(format_p_value(0.05), "5.000E-2");
    }

    #[test]
    fn abundance_formatting() {
        assert_eq!(format_abundance(7.5), "7.50%");
        assert_eq!(format_abundance(100.0), "100.00%");
        assert_eq!(format_abundance(0.0), "0.00%");
    }

    #[test]
    fn ordinal_formatting() {
        assert_eq!(format_ordinal(1), "1)");
        assert_eq!(format_ordinal(3), "3)");
    }

    #[test]
    fn ordinals_follow_presentation_order() {
        let mut model = TableModel::new();
        model
            .add_row(stub(4), "ACGT", 0.01, 10.0, 20.0, stub(6))
            .unwrap();
        model
            .add_row(stub(4), "TTAA", 0.02, 11.0, 21.0, stub(6))
            .unwrap();
        assert_eq!(model.rows()[0].ordinal(), 1);
        assert_eq!(model.rows()[1].ordinal(), 2);
        match model.rows()[1].cell(Column::Identifier) {
            Cell::Text { text, role } => {
                assert_eq!(text, "2)");
                assert_eq!(role, FontRole::BoldIdentifier);
            }
            _ => panic!("identifier cell must be text"),
        }
    }

    #[test]
    fn formatted_string_is_what_the_cell_exposes() {
        let mut model = TableModel::new();
        model
            .add_row(stub(4), "ACGT", 0.0000123, 7.5, 42.0, stub(6))
            .unwrap();
        let row = &model.rows()[0];
        match row.cell(Column::PValue) {
            Cell::Text { text, .. } => assert_eq!(text, "1.230E-5"),
            _ => panic!("p-value cell must be text"),
        }
        match row.cell(Column::SeedAbundance) {
            Cell::Text { text, .. } => assert_eq!(text, "7.50%"),
            _ => panic!("abundance cell must be text"),
        }
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let mut model = TableModel::new();
        assert!(
            model
                .add_row(stub(4), "", 0.01, 10.0, 20.0, stub(6))
                .is_err()
        );
        assert!(
            model
                .add_row(stub(4), "ACGT", f64::NAN, 10.0, 20.0, stub(6))
                .is_err()
        );
        assert!(
            model
                .add_row(stub(4), "ACGT", 0.01, 101.0, 20.0, stub(6))
                .is_err()
        );
        assert!(
            model
                .add_row(stub(4), "ACGT", 0.01, 10.0, -1.0, stub(6))
                .is_err()
        );
        assert!(
            model
                .add_row(stub(0), "ACGT", 0.01, 10.0, 20.0, stub(6))
                .is_err()
        );
        assert_eq!(model.row_count(), 0);
    }

    #[test]
    fn column_order_and_kinds_are_fixed() {
        assert_eq!(Column::ALL.len(), Column::COUNT);
        assert_eq!(Column::ALL[0].label(), "ID");
        assert_eq!(Column::ALL[5].label(), "K-context Trace");
        assert_eq!(Column::ALL[6].label(), "Motif Freq.");
        assert_eq!(Column::MotifGraphic.kind(), CellKind::Graphic);
        assert_eq!(Column::PValue.kind(), CellKind::Numeric);
        assert_eq!(Column::Seed.kind(), CellKind::Text);
    }
}
