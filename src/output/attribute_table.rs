// HTML renderer for attribute table nodes

use crate::error::Result;
use crate::output::templates::TemplateEngine;

pub const NODE_TYPE: &str = "attribute_table";

const TEMPLATE_NAME: &str = "nodes/attribute_table.html";

/// Register the attribute table renderer with `engine`
pub fn register(engine: &mut TemplateEngine) -> Result<()> {
    engine.register_node(
        NODE_TYPE,
        TEMPLATE_NAME,
        include_str!("../../templates/nodes/attribute_table.html.tera"),
    )
}
