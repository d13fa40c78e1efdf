//! Generic rendering of records: the create/edit form, the read-only view
//! and the list table. All three are driven by the module's field descriptors.

mod form;
mod table;
mod view;

pub use form::{Form, FormErrors, Widget, WidgetKind};
pub use table::{Table, TableRow};
pub use view::{DisplayLocale, DisplayValue, View, ViewRow, format_value};
