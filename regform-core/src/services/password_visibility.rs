//! Password show/hide toggle state

/// 密码隐藏时的图标
pub const ICON_MASKED: &str = "bi-eye-slash";
/// 密码可见时的图标
pub const ICON_REVEALED: &str = "bi-eye";

/// 单个密码字段的显示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordVisibility {
    masked: bool,
    button_visible: bool,
}

impl Default for PasswordVisibility {
    fn default() -> Self {
        Self {
            masked: true,
            button_visible: false,
        }
    }
}

impl PasswordVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn is_button_visible(&self) -> bool {
        self.button_visible
    }

    /// 输入框应使用的 `type` 属性
    pub fn input_type(&self) -> &'static str {
        if self.masked {
            "password"
        } else {
            "text"
        }
    }

    pub fn icon_class(&self) -> &'static str {
        if self.masked {
            ICON_MASKED
        } else {
            ICON_REVEALED
        }
    }

    /// 跟踪输入内容；清空时隐藏按钮并恢复隐藏
    pub fn on_input(&mut self, value: &str) {
        self.button_visible = !value.is_empty();
        if !self.button_visible {
            self.masked = true;
        }
    }

    /// 切换隐藏/可见；按钮隐藏时忽略
    pub fn toggle(&mut self) {
        if self.button_visible {
            self.masked = !self.masked;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_needs_content() {
        let mut visibility = PasswordVisibility::new();
        visibility.toggle();
        assert!(visibility.is_masked());

        visibility.on_input("a");
        visibility.toggle();
        assert!(!visibility.is_masked());
        assert_eq!(visibility.input_type(), "text");
        assert_eq!(visibility.icon_class(), ICON_REVEALED);
    }

    #[test]
    fn clearing_field_restores_mask() {
        let mut visibility = PasswordVisibility::new();
        visibility.on_input("secret");
        visibility.toggle();

        visibility.on_input("");

        assert!(visibility.is_masked());
        assert!(!visibility.is_button_visible());
        assert_eq!(visibility.input_type(), "password");
    }
}
