use crate::errors::{RedDeerError, RedDeerResult};
use crate::matchers::strip_mnemonic;
use crate::widget::{Widget, WidgetFamily, WidgetKind};

/// Finds the label describing an input control. UI thread only.
///
/// Walks backwards from the control through its preceding siblings: labels
/// carrying an image are skipped, the first label without an image wins, and
/// any other widget ends the search with no label. The result has mnemonic
/// markers removed and everything from the first tab on cut off.
pub fn label_of(widget: &Widget) -> RedDeerResult<Option<String>> {
    if !has_label(widget) {
        return Err(RedDeerError::unsupported("label", widget.kind()));
    }
    let Some(parent) = widget.raw().parent()? else {
        return Ok(None);
    };
    let siblings = parent.raw().children()?;
    let Some(position) = siblings.iter().position(|sibling| sibling == widget) else {
        return Ok(None);
    };

    for sibling in siblings[..position].iter().rev() {
        if sibling.kind() != WidgetKind::Label {
            return Ok(None);
        }
        if !sibling.raw().has_image()? {
            return Ok(Some(clean_label(&sibling.raw().text()?)));
        }
    }
    Ok(None)
}

/// Input controls are the only widgets with an associated label.
pub fn has_label(widget: &Widget) -> bool {
    matches!(
        widget.family(),
        WidgetFamily::TextInput | WidgetFamily::ListLike | WidgetFamily::Selectable
    )
}

/// Strips mnemonics and drops tab-separated trailing help text.
pub fn clean_label(raw: &str) -> String {
    let stripped = strip_mnemonic(raw);
    match stripped.split_once('\t') {
        Some((head, _)) => head.to_string(),
        None => stripped,
    }
}
