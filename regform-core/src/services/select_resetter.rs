//! 选择框重置

use crate::types::{SelectField, SelectOption};

/// 选择框重置工具
pub struct SelectResetter;

impl SelectResetter {
    /// 将选择框清空为单个占位项
    ///
    /// 无论之前状态如何，之后 `options == [placeholder]`、`selected_index == 0`，
    /// `disabled` 与参数一致。加载状态由调用方设置。
    pub fn reset(select: &mut SelectField, placeholder: &str, disabled: bool) {
        select.options.clear();
        select.options.push(SelectOption::placeholder(placeholder));
        select.selected_index = 0;
        select.disabled = disabled;
    }

    /// 重置后在占位项之后追加 `items`
    pub fn populate(select: &mut SelectField, placeholder: &str, items: Vec<SelectOption>) {
        Self::reset(select, placeholder, false);
        select.options.extend(items);
    }
}
