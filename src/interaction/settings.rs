//! Widget settings and the context menu that toggles them.
//!
//! Settings live outside the widget core. The interaction handler receives
//! them by reference and reports every change back as a
//! [`WidgetRequest::SettingsChanged`](crate::WidgetRequest::SettingsChanged)
//! for the settings layer to persist.

/// User-facing toggles shown in the widget's context menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetSettings {
    /// Open chats in the global chat panel.
    pub use_global_chat: bool,
    /// Generate suggestions while typing.
    pub realtime_suggestion: bool,
    /// Insert accepted suggestions through the accessibility API.
    pub accept_via_accessibility_api: bool,
    /// Strip leading whitespace common to all suggestion lines.
    pub hide_common_leading_spaces: bool,
    /// Keep the widget window ordered in front.
    pub force_widget_to_front: bool,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            use_global_chat: true,
            realtime_suggestion: true,
            accept_via_accessibility_api: false,
            hide_common_leading_spaces: true,
            force_widget_to_front: true,
        }
    }
}

/// One toggleable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingToggle {
    /// [`WidgetSettings::use_global_chat`]
    UseGlobalChat,
    /// [`WidgetSettings::realtime_suggestion`]
    RealtimeSuggestion,
    /// [`WidgetSettings::accept_via_accessibility_api`]
    AcceptViaAccessibilityApi,
    /// [`WidgetSettings::hide_common_leading_spaces`]
    HideCommonLeadingSpaces,
    /// [`WidgetSettings::force_widget_to_front`]
    ForceWidgetToFront,
}

impl SettingToggle {
    /// Every toggle, in menu order.
    pub const ALL: [Self; 5] = [
        Self::UseGlobalChat,
        Self::RealtimeSuggestion,
        Self::AcceptViaAccessibilityApi,
        Self::HideCommonLeadingSpaces,
        Self::ForceWidgetToFront,
    ];

    /// Menu label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::UseGlobalChat => "Use Global Chat",
            Self::RealtimeSuggestion => "Realtime Suggestion",
            Self::AcceptViaAccessibilityApi => "Accept Suggestion with Accessibility API",
            Self::HideCommonLeadingSpaces => "Hide Common Preceding Spaces in Suggestion",
            Self::ForceWidgetToFront => "Force Order Widget to Front",
        }
    }

    /// Current value in `settings`.
    pub const fn get(self, settings: &WidgetSettings) -> bool {
        match self {
            Self::UseGlobalChat => settings.use_global_chat,
            Self::RealtimeSuggestion => settings.realtime_suggestion,
            Self::AcceptViaAccessibilityApi => settings.accept_via_accessibility_api,
            Self::HideCommonLeadingSpaces => settings.hide_common_leading_spaces,
            Self::ForceWidgetToFront => settings.force_widget_to_front,
        }
    }

    /// Flip the setting and return its new value.
    pub fn toggle(self, settings: &mut WidgetSettings) -> bool {
        let slot = match self {
            Self::UseGlobalChat => &mut settings.use_global_chat,
            Self::RealtimeSuggestion => &mut settings.realtime_suggestion,
            Self::AcceptViaAccessibilityApi => &mut settings.accept_via_accessibility_api,
            Self::HideCommonLeadingSpaces => &mut settings.hide_common_leading_spaces,
            Self::ForceWidgetToFront => &mut settings.force_widget_to_front,
        };
        *slot = !*slot;
        *slot
    }
}

/// One line of the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    /// The setting this entry toggles.
    pub item: SettingToggle,
    /// Display label.
    pub label: &'static str,
    /// Whether a checkmark is shown.
    pub checked: bool,
}

/// The widget's context menu.
pub struct ContextMenu;

impl ContextMenu {
    /// Menu entries reflecting `settings`.
    pub fn entries(settings: &WidgetSettings) -> Vec<MenuEntry> {
        SettingToggle::ALL
            .iter()
            .map(|&item| MenuEntry {
                item,
                label: item.label(),
                checked: item.get(settings),
            })
            .collect()
    }
}
