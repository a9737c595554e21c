//! Status labels and icons for tool invocations shown in the chat stream.
//!
//! Every input maps to a label: unknown tools, unknown commands and
//! missing arguments all fall back to a defined string.

use serde::{Deserialize, Serialize};
use std::fmt;

const STR_REPLACE_EDITOR: &str = "str_replace_editor";
const FILE_MANAGER: &str = "file_manager";

/// Arguments the model passed to a file tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
}

impl ToolArgs {
    pub fn new(command: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
            path: Some(path.into()),
            new_path: None,
        }
    }

    pub fn with_new_path(mut self, new_path: impl Into<String>) -> Self {
        self.new_path = Some(new_path.into());
        self
    }
}

/// Lifecycle state of an invocation. Anything other than `result` is still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvocationState {
    Call,
    Result,
    Other(String),
}

impl InvocationState {
    pub fn is_complete(&self) -> bool {
        matches!(self, InvocationState::Result)
    }
}

impl From<String> for InvocationState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "call" => InvocationState::Call,
            "result" => InvocationState::Result,
            _ => InvocationState::Other(s),
        }
    }
}

impl From<&str> for InvocationState {
    fn from(s: &str) -> Self {
        InvocationState::from(s.to_string())
    }
}

impl From<InvocationState> for String {
    fn from(state: InvocationState) -> Self {
        match state {
            InvocationState::Call => "call".into(),
            InvocationState::Result => "result".into(),
            InvocationState::Other(s) => s,
        }
    }
}

/// A tool invocation record as streamed to the chat UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    pub tool_name: String,
    pub state: InvocationState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<ToolArgs>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    FilePlus,
    FileEdit,
    FolderOpen,
    Trash,
    FileText,
}

impl Icon {
    pub fn as_str(self) -> &'static str {
        match self {
            Icon::FilePlus => "file-plus",
            Icon::FileEdit => "file-edit",
            Icon::FolderOpen => "folder-open",
            Icon::Trash => "trash",
            Icon::FileText => "file-text",
        }
    }
}

/// Leading marker next to the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Spinner,
    Success,
}

impl Indicator {
    pub fn for_state(state: &InvocationState) -> Self {
        if state.is_complete() {
            Indicator::Success
        } else {
            Indicator::Spinner
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Indicator::Spinner => "…",
            Indicator::Success => "●",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolLabel {
    pub label: String,
    pub icon: Icon,
}

/// Everything the UI needs to draw one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolBadge {
    pub label: String,
    pub icon: Icon,
    pub indicator: Indicator,
}

impl fmt::Display for ToolBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.indicator.glyph(), self.icon.as_str(), self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorCommand {
    Create,
    StrReplace,
    Insert,
    View,
    Other,
}

impl EditorCommand {
    fn parse(command: Option<&str>) -> Self {
        match command {
            Some("create") => EditorCommand::Create,
            Some("str_replace") => EditorCommand::StrReplace,
            Some("insert") => EditorCommand::Insert,
            Some("view") => EditorCommand::View,
            _ => EditorCommand::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileManagerCommand {
    Delete,
    Rename,
    Other,
}

impl FileManagerCommand {
    fn parse(command: Option<&str>) -> Self {
        match command {
            Some("delete") => FileManagerCommand::Delete,
            Some("rename") => FileManagerCommand::Rename,
            _ => FileManagerCommand::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolAction {
    Editor(EditorCommand),
    FileManager(FileManagerCommand),
    Unknown,
}

impl ToolAction {
    fn classify(tool_name: &str, args: &ToolArgs) -> Self {
        let command = args.command.as_deref();
        match tool_name {
            STR_REPLACE_EDITOR => ToolAction::Editor(EditorCommand::parse(command)),
            FILE_MANAGER => ToolAction::FileManager(FileManagerCommand::parse(command)),
            _ => ToolAction::Unknown,
        }
    }
}

/// Final `/`-separated segment of a path; empty for absent, empty, or
/// slash-terminated paths.
pub fn file_name(path: Option<&str>) -> &str {
    path.and_then(|p| p.rsplit('/').next()).unwrap_or("")
}

/// Map a tool name and its arguments to a label and icon.
pub fn resolve(tool_name: &str, args: Option<&ToolArgs>) -> ToolLabel {
    let args = match args {
        Some(a) => a,
        None => {
            return ToolLabel {
                label: tool_name.to_string(),
                icon: Icon::FileText,
            }
        }
    };

    let name = file_name(args.path.as_deref());
    let (label, icon) = match ToolAction::classify(tool_name, args) {
        ToolAction::Editor(EditorCommand::Create) => (format!("Creating {}", name), Icon::FilePlus),
        ToolAction::Editor(EditorCommand::StrReplace | EditorCommand::Insert) => {
            (format!("Editing {}", name), Icon::FileEdit)
        }
        ToolAction::Editor(EditorCommand::View) => (format!("Viewing {}", name), Icon::FolderOpen),
        ToolAction::Editor(EditorCommand::Other) => (format!("Editing {}", name), Icon::FileText),
        ToolAction::FileManager(FileManagerCommand::Delete) => {
            (format!("Deleting {}", name), Icon::Trash)
        }
        ToolAction::FileManager(FileManagerCommand::Rename) => {
            let new_name = file_name(args.new_path.as_deref());
            let label = if new_name.is_empty() {
                format!("Renaming {}", name)
            } else {
                format!("Renaming {} to {}", name, new_name)
            };
            (label, Icon::FileEdit)
        }
        ToolAction::FileManager(FileManagerCommand::Other) => {
            (format!("Managing {}", name), Icon::FileText)
        }
        ToolAction::Unknown => (tool_name.to_string(), Icon::FileText),
    };

    ToolLabel { label, icon }
}

/// Resolve a full invocation record, including its progress indicator.
pub fn badge_for(invocation: &ToolInvocation) -> ToolBadge {
    let ToolLabel { label, icon } = resolve(&invocation.tool_name, invocation.args.as_ref());
    ToolBadge {
        label,
        icon,
        indicator: Indicator::for_state(&invocation.state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(tool: &str, args: ToolArgs) -> String {
        resolve(tool, Some(&args)).label
    }

    #[test]
    fn test_editor_commands() {
        let create = resolve(
            STR_REPLACE_EDITOR,
            Some(&ToolArgs::new("create", "/components/Button.tsx")),
        );
        assert_eq!(create.label, "Creating Button.tsx");
        assert_eq!(create.icon, Icon::FilePlus);

        let replace = resolve(STR_REPLACE_EDITOR, Some(&ToolArgs::new("str_replace", "/App.jsx")));
        assert_eq!(replace.label, "Editing App.jsx");
        assert_eq!(replace.icon, Icon::FileEdit);

        let insert = resolve(
            STR_REPLACE_EDITOR,
            Some(&ToolArgs::new("insert", "/utils/helper.ts")),
        );
        assert_eq!(insert.label, "Editing helper.ts");
        assert_eq!(insert.icon, Icon::FileEdit);

        let view = resolve(STR_REPLACE_EDITOR, Some(&ToolArgs::new("view", "/styles/main.css")));
        assert_eq!(view.label, "Viewing main.css");
        assert_eq!(view.icon, Icon::FolderOpen);
    }

    #[test]
    fn test_editor_unknown_or_missing_command() {
        let undo = resolve(STR_REPLACE_EDITOR, Some(&ToolArgs::new("undo_edit", "/a/b.ts")));
        assert_eq!(undo.label, "Editing b.ts");
        assert_eq!(undo.icon, Icon::FileText);

        let missing = ToolArgs {
            path: Some("/a/b.ts".into()),
            ..Default::default()
        };
        let resolved = resolve(STR_REPLACE_EDITOR, Some(&missing));
        assert_eq!(resolved.label, "Editing b.ts");
        assert_eq!(resolved.icon, Icon::FileText);
    }

    #[test]
    fn test_file_manager_commands() {
        let delete = resolve(FILE_MANAGER, Some(&ToolArgs::new("delete", "/OldComponent.tsx")));
        assert_eq!(delete.label, "Deleting OldComponent.tsx");
        assert_eq!(delete.icon, Icon::Trash);

        let rename = resolve(
            FILE_MANAGER,
            Some(&ToolArgs::new("rename", "/Button.tsx").with_new_path("/components/Button.tsx")),
        );
        assert_eq!(rename.label, "Renaming Button.tsx to Button.tsx");
        assert_eq!(rename.icon, Icon::FileEdit);

        assert_eq!(
            label(FILE_MANAGER, ToolArgs::new("rename", "/OldFile.tsx")),
            "Renaming OldFile.tsx"
        );
        assert_eq!(
            label(FILE_MANAGER, ToolArgs::new("rename", "/Old.tsx").with_new_path("/")),
            "Renaming Old.tsx"
        );

        let other = resolve(FILE_MANAGER, Some(&ToolArgs::new("chmod", "/x/run.sh")));
        assert_eq!(other.label, "Managing run.sh");
        assert_eq!(other.icon, Icon::FileText);
    }

    #[test]
    fn test_missing_args_returns_tool_name() {
        for tool in [STR_REPLACE_EDITOR, FILE_MANAGER, "web_search", ""] {
            let resolved = resolve(tool, None);
            assert_eq!(resolved.label, tool);
            assert_eq!(resolved.icon, Icon::FileText);
        }
    }

    #[test]
    fn test_unknown_tool_ignores_args() {
        let resolved = resolve("web_search", Some(&ToolArgs::new("create", "/a/b.ts")));
        assert_eq!(resolved.label, "web_search");
        assert_eq!(resolved.icon, Icon::FileText);
    }

    #[test]
    fn test_file_name_extraction() {
        assert_eq!(file_name(Some("Button.tsx")), "Button.tsx");
        assert_eq!(file_name(Some("/components/ui/card/Card.tsx")), "Card.tsx");
        assert_eq!(file_name(Some("//double//lead.rs")), "lead.rs");
        assert_eq!(file_name(Some("")), "");
        assert_eq!(file_name(Some("/")), "");
        assert_eq!(file_name(Some("/dir/")), "");
        assert_eq!(file_name(None), "");
    }

    #[test]
    fn test_empty_paths_produce_trailing_space() {
        assert_eq!(label(STR_REPLACE_EDITOR, ToolArgs::new("create", "")), "Creating ");
        assert_eq!(label(STR_REPLACE_EDITOR, ToolArgs::new("create", "/")), "Creating ");
        let no_path = ToolArgs {
            command: Some("delete".into()),
            ..Default::default()
        };
        assert_eq!(label(FILE_MANAGER, no_path), "Deleting ");
    }

    #[test]
    fn test_badge_indicator_follows_state() {
        let mut invocation = ToolInvocation {
            tool_call_id: Some("call_1".into()),
            tool_name: STR_REPLACE_EDITOR.into(),
            state: InvocationState::Call,
            args: Some(ToolArgs::new("create", "/App.jsx")),
        };
        let running = badge_for(&invocation);
        assert_eq!(running.indicator, Indicator::Spinner);

        invocation.state = InvocationState::Result;
        let done = badge_for(&invocation);
        assert_eq!(done.indicator, Indicator::Success);
        assert_eq!(running.label, done.label);
        assert_eq!(running.icon, done.icon);

        invocation.state = "partial-call".into();
        assert_eq!(badge_for(&invocation).indicator, Indicator::Spinner);
    }

    #[test]
    fn test_invocation_deserializes_from_wire_format() {
        let json = r#"{
            "toolCallId": "abc",
            "toolName": "file_manager",
            "state": "result",
            "args": {"command": "rename", "path": "/a.ts", "new_path": "/lib/b.ts"}
        }"#;
        let invocation: ToolInvocation = serde_json::from_str(json).unwrap();
        assert_eq!(invocation.state, InvocationState::Result);

        let badge = badge_for(&invocation);
        assert_eq!(badge.label, "Renaming a.ts to b.ts");
        assert_eq!(
            serde_json::to_value(&badge).unwrap(),
            serde_json::json!({"label": "Renaming a.ts to b.ts", "icon": "file-edit", "indicator": "success"})
        );

        let odd: ToolInvocation =
            serde_json::from_str(r#"{"toolName": "x", "state": "streaming"}"#).unwrap();
        assert_eq!(odd.state, InvocationState::Other("streaming".into()));
        assert!(odd.args.is_none());
    }

    #[test]
    fn test_badge_display() {
        let badge = ToolBadge {
            label: "Creating App.jsx".into(),
            icon: Icon::FilePlus,
            indicator: Indicator::Success,
        };
        assert_eq!(badge.to_string(), "● [file-plus] Creating App.jsx");
    }
}
