//! Typed views for tables and their parts.

use crate::kind::MarkupKind;
use crate::node::MarkupNode;
use crate::raw::{ColumnAlignment, RawData, RawNode};

use super::{raw_children, typed_node};

typed_node! {
    /// A table: exactly one head and one body.
    Table
}

impl Table {
    pub fn new(
        column_alignments: Vec<ColumnAlignment>,
        head: TableHead,
        body: TableBody,
    ) -> Table {
        Table(MarkupNode::new_root(RawNode::table(
            column_alignments,
            None,
            vec![
                head.into_markup().raw().clone(),
                body.into_markup().raw().clone(),
            ],
        )))
    }

    pub fn column_alignments(&self) -> &[ColumnAlignment] {
        match self.0.data() {
            RawData::Table { column_alignments } => column_alignments,
            _ => unreachable!("table view over a different kind"),
        }
    }

    pub fn head(&self) -> TableHead {
        TableHead::from_markup_unchecked(
            self.0
                .child_at(0)
                .expect("a table always has a head"),
        )
    }

    pub fn body(&self) -> TableBody {
        TableBody::from_markup_unchecked(
            self.0
                .child_at(1)
                .expect("a table always has a body"),
        )
    }
}

typed_node! {
    /// The header row of a table; children are cells.
    TableHead
}

impl TableHead {
    pub fn new(cells: impl IntoIterator<Item = TableCell>) -> TableHead {
        let raws = cells
            .into_iter()
            .map(|c| c.into_markup().raw().clone())
            .collect();
        TableHead(MarkupNode::new_root(RawNode::table_head(None, raws)))
    }
}

typed_node! {
    /// The body of a table; children are rows.
    TableBody
}

impl TableBody {
    pub fn new(rows: impl IntoIterator<Item = TableRow>) -> TableBody {
        let raws = rows
            .into_iter()
            .map(|r| r.into_markup().raw().clone())
            .collect();
        TableBody(MarkupNode::new_root(RawNode::table_body(None, raws)))
    }
}

typed_node! {
    /// One body row; children are cells.
    TableRow
}

impl TableRow {
    pub fn new(cells: impl IntoIterator<Item = TableCell>) -> TableRow {
        let raws = cells
            .into_iter()
            .map(|c| c.into_markup().raw().clone())
            .collect();
        TableRow(MarkupNode::new_root(RawNode::table_row(None, raws)))
    }
}

typed_node! {
    /// One cell. Spans are carried in the payload; the parser always
    /// produces 1×1 cells, wider spans are set programmatically.
    TableCell
}

impl TableCell {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> TableCell {
        TableCell(MarkupNode::new_root(RawNode::table_cell(
            1,
            1,
            None,
            raw_children(children),
        )))
    }

    pub fn colspan(&self) -> u32 {
        match self.0.data() {
            RawData::TableCell { colspan, .. } => *colspan,
            _ => unreachable!("table cell view over a different kind"),
        }
    }

    pub fn rowspan(&self) -> u32 {
        match self.0.data() {
            RawData::TableCell { rowspan, .. } => *rowspan,
            _ => unreachable!("table cell view over a different kind"),
        }
    }

    pub fn set_colspan(&mut self, colspan: u32) {
        let rowspan = self.rowspan();
        let raw = self
            .0
            .raw()
            .with_data(RawData::TableCell { colspan, rowspan });
        self.0 = self.0.replacing_self(raw, false);
    }

    pub fn set_rowspan(&mut self, rowspan: u32) {
        let colspan = self.colspan();
        let raw = self
            .0
            .raw()
            .with_data(RawData::TableCell { colspan, rowspan });
        self.0 = self.0.replacing_self(raw, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::Text;

    fn cell(text: &str) -> TableCell {
        TableCell::new([Text::new(text).into_markup()])
    }

    #[test]
    fn table_shape() {
        let table = Table::new(
            vec![ColumnAlignment::Left, ColumnAlignment::Unspecified],
            TableHead::new([cell("a"), cell("b")]),
            TableBody::new([TableRow::new([cell("1"), cell("2")])]),
        );
        assert_eq!(table.as_markup().kind(), MarkupKind::Table);
        assert_eq!(table.head().as_markup().child_count(), 2);
        assert_eq!(table.body().as_markup().child_count(), 1);
        assert_eq!(table.column_alignments().len(), 2);
    }

    #[test]
    fn cell_spans_default_to_one() {
        let mut c = cell("x");
        assert_eq!((c.colspan(), c.rowspan()), (1, 1));
        c.set_colspan(2);
        assert_eq!((c.colspan(), c.rowspan()), (2, 1));
    }
}
