//! Range expansion: `ADDR..ADDR` to a list of cell values.

use super::preprocess::RefContext;
use super::{Address, Value, max_row_len};

/// Resolve an address to `(row, col)` for range purposes.
/// `None` on an axis means the address leaves that axis open.
fn resolve_corner(addr: &Address, ctx: &RefContext) -> (Option<isize>, Option<isize>) {
    let row = addr
        .row
        .and_then(|spec| spec.resolve(Some(ctx.row), ctx.table.len()));
    let col = addr
        .col
        .and_then(|spec| spec.resolve(Some(ctx.col), max_row_len(ctx.table)));
    (row, col)
}

/// Expand the rectangle between two addresses, row-major.
///
/// - Neither end names a column: the sweep stays in the current column.
/// - Neither end names a row: the sweep covers the data rows.
/// - Only one end constrains an axis, or the start is negative: empty.
///
/// Indices past the end of the table or of a row stop that sweep.
pub fn expand_range(start: &Address, end: &Address, ctx: &RefContext) -> Vec<Value> {
    let (mut start_row, mut start_col) = resolve_corner(start, ctx);
    let (mut end_row, mut end_col) = resolve_corner(end, ctx);

    if start_col.is_none() && end_col.is_none() {
        start_col = Some(ctx.col as isize);
        end_col = Some(ctx.col as isize);
    }
    if start_row.is_none() && end_row.is_none() {
        start_row = Some(ctx.data_start_row as isize);
        end_row = Some(ctx.table.len() as isize - 1);
    }

    let (Some(r1), Some(r2), Some(c1), Some(c2)) = (start_row, end_row, start_col, end_col) else {
        return Vec::new();
    };
    if r1 < 0 || c1 < 0 {
        return Vec::new();
    }

    let mut values = Vec::new();
    let mut row = r1;
    while row <= r2 {
        let Some(cells) = ctx.table.get(row as usize) else {
            break;
        };
        let mut col = c1;
        while col <= c2 {
            let Some(text) = cells.get(col as usize) else {
                break;
            };
            values.push(Value::from_cell(text));
            col += 1;
        }
        row += 1;
    }
    values
}

/// Render a range as an array literal, e.g. `[30,10,"Total"]`.
pub fn range_literal(values: &[Value]) -> String {
    let parts: Vec<String> = values.iter().filter_map(Value::to_literal).collect();
    format!("[{}]", parts.join(","))
}
