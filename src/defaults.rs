//! Built-in default settings
//!
//! Applied with `set_if_absent` on every startup, so defaults added in a new
//! release reach existing databases without touching user values.

use crate::value::IntoSetting;

/// Ordered list of `(key, lines)` default entries
pub type Defaults = Vec<(String, Vec<String>)>;

/// Setting that turns on a backup after every successful flush
pub const AUTOMATIC_BACKUP_KEY: &str = "AutomaticSettingsBackup";

/// Default AutoHotkey script: WASD movement plus hotkeyed commands
pub const DEFAULT_WASD_SCRIPT: &[&str] = &[
    "; Suspend autohotkey mode with Ctrl+Enter",
    "Ctrl+Enter::Suspend",
    "; Enable WASD Movement",
    "W::Up",
    "A::Left",
    "S::Down",
    "D::Right",
    "; Enable diagonal movement with QEZC",
    "Q::NumpadHome",
    "E::NumpadPgUp",
    "Z::NumpadEnd",
    "C::NumpadPgDn",
    "; Hotkey Tibialyzer commands",
    "; Open loot window with the [ key",
    "[::Command=loot@",
    "; Show exp with ] key",
    "]::Command=exp@",
    "; Close all windows when = key is pressed",
    "=::Command=close@",
    "; Open last window with - key",
    "-::Command=refresh@",
    "",
];

/// Incrementally assembled default set
///
/// Later entries for an existing key are ignored, matching how the defaults
/// are applied to the store.
#[derive(Debug, Clone, Default)]
pub struct DefaultSet {
    entries: Defaults,
}

impl DefaultSet {
    /// Start an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl IntoSetting) -> Self {
        let key = key.into();
        if !self.entries.iter().any(|(k, _)| *k == key) {
            self.entries.push((key, value.into_lines()));
        }
        self
    }

    /// Add the placement entries of one notification window type
    ///
    /// Spaces are stripped from `name` to form the key prefix.
    #[must_use]
    pub fn with_notification(self, name: &str) -> Self {
        let prefix = name.replace(' ', "");
        self.with(format!("{prefix}Anchor"), 0)
            .with(format!("{prefix}XOffset"), 30)
            .with(format!("{prefix}YOffset"), 30)
            .with(format!("{prefix}Duration"), 30)
            .with(format!("{prefix}Group"), 0)
    }

    /// Add the layout entries of one HUD type
    ///
    /// Spaces are stripped from `name` to form the key prefix.
    #[must_use]
    pub fn with_hud(self, name: &str) -> Self {
        let prefix = name.replace(' ', "");
        self.with(format!("{prefix}Anchor"), 1)
            .with(format!("{prefix}XOffset"), 180)
            .with(format!("{prefix}YOffset"), 30)
            .with(format!("{prefix}FontSize"), 20)
            .with(format!("{prefix}Width"), 200)
            .with(format!("{prefix}Height"), 65)
            .with(format!("{prefix}ShowOnStartup"), false)
            .with(format!("{prefix}Opacity"), 0.8)
            .with(format!("{prefix}DisplayText"), true)
    }

    /// Finish the set
    #[must_use]
    pub fn build(self) -> Defaults {
        self.entries
    }
}

/// The built-in default set
#[must_use]
pub fn builtin() -> Defaults {
    DefaultSet::new()
        .with("EnableEventNotifications", true)
        .with("EnableUnrecognizedNotifications", true)
        .with("CopyAdvances", true)
        .with("UseRichNotificationType", true)
        .with("LookMode", true)
        .with(AUTOMATIC_BACKUP_KEY, false)
        .with("StartAutohotkeyAutomatically", false)
        .with("ShutdownAutohotkeyOnExit", false)
        .with("NotificationItems", "")
        .with("AutoHotkeySettings", DEFAULT_WASD_SCRIPT)
        .with("AutoScreenshotAdvance", false)
        .with("AutoScreenshotItemDrop", false)
        .with("AutoScreenshotDeath", false)
        .with("EnableScreenshots", false)
        .with("Names", "Mytherin")
        .with("ScanSpeed", "50")
        .with("OutfitGenderMale", true)
        .with("RichNotificationXOffset", 30)
        .with("RichNotificationYOffset", 30)
        .with("RichNotificationAnchor", 0)
        .with("SimpleNotificationXOffset", 5)
        .with("SimpleNotificationYOffset", 10)
        .with("SimpleNotificationAnchor", 3)
        .with("EnableSimpleNotificationAnimation", true)
        .with("SuspendedNotificationXOffset", 10)
        .with("SuspendedNotificationYOffset", 10)
        .with("SuspendedNotificationAnchor", 1)
        .with("TibiaClientName", "Tibia")
        .with("StackAllItems", false)
        .with("IgnoreLowExperience", false)
        .with("IgnoreLowExperienceValue", 250)
        .with("AutomaticallyWriteLootToFile", true)
        .with("NotificationConditions", "item.value >= 2000")
        .with("CityDisplayFormWidth", 396)
        .with("CreatureDropsFormWidth", 358)
        .with("CreatureStatsFormWidth", 378)
        .with("DamageChartWidth", 450)
        .with("ExperienceChartWidth", 450)
        .with("SummaryFormWidth", 210)
        .with("ItemViewFormWidth", 378)
        .with("PopupDuration", 8)
        .with("SummaryMaxItemDrops", 5)
        .with("SummaryMaxCreatures", 5)
        .with("SummaryMaxRecentDrops", 5)
        .with("SummaryMaxDamagePlayers", 5)
        .with("SummaryMaxUsedItems", 5)
        .with("ExperiencePerHourCalculation", "TibiaStyle")
        .with("SimpleNotificationWidth", 354)
        .with("SimpleNotificationCopyButton", true)
        .with("ScanInternalTabStructure", true)
        .with("SkipDuplicateLoot", false)
        .with("ManaBarYOffset", 95)
        .with("ExperienceBarYOffset", 160)
        .with("CurvedBarsWidth", 300)
        .with("CurvedBarsHeight", 300)
        .with("CurvedBarsAnchor", 4)
        .with("CurvedBarsXOffset", -100)
        .with("CurvedBarsYOffset", -100)
        .with("PortraitAnchor", 0)
        .with("PortraitXOffset", 300)
        .with("PortraitYOffset", 20)
        .with("PortraitWidth", 300)
        .with("PortraitHeight", 200)
        .with("HealthListDisplayNames", true)
        .with("HealthListDisplayIcons", false)
        .with("HealthListPlayerList", "")
        .with("NotificationShowTibiaActive", false)
        .with("MonitorAnchor", 0)
        .with("SummaryLootItemSize", 25)
        .with("SummaryRecentDropsItemSize", 25)
        .with("SummaryWasteItemSize", 25)
        .with("MaxDamageChartPlayers", 0)
        .with("PortraitBackgroundScale", 100)
        .with("PortraitBackgroundXOffset", 0)
        .with("PortraitBackgroundYOffset", 0)
        .with("PortraitCenterScale", 80)
        .with("PortraitCenterXOffset", 0)
        .with("PortraitCenterYOffset", 0)
        .with("GatherExtraPlayerInformation", false)
        .with("TibialyzerLanguage", "en-US")
        .with("AutomaticallyDetectCharacter", true)
        .with("AutomaticallyDownloadAddresses", true)
        .with("TibiaClient", "Classic")
        .build()
}
