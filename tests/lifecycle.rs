use egui::Pos2;
use egui_statespace::{
    import_tree_from_str, Diagram, LayoutMode, RefreshRequest, SettingsStyle, GOAL_NAME,
};

const SEARCH_GRAPH: &str = r##"{
    "name": "root",
    "state": "c",
    "color": "#4682b4",
    "predicates": ["at a", "at b", "holding x", "clear y"],
    "children": [
        {
            "name": "goal state",
            "state": "3",
            "action": "move a b",
            "color": "#ff0000"
        },
        {
            "name": "dead end",
            "state": ["holding x"],
            "action": "pickup x",
            "children": [
                {"name": "dead end", "state": ["holding x", "at a"]}
            ]
        }
    ]
}"##;

fn loaded_diagram() -> Diagram {
    let tree = import_tree_from_str(SEARCH_GRAPH).expect("graph json should parse");
    Diagram::new(tree)
}

#[test]
fn load_renders_the_whole_tree_and_reports_its_size() {
    let mut diagram = loaded_diagram();
    assert_eq!(diagram.take_request(), Some(RefreshRequest::Load));

    diagram.seed_origin(Pos2::new(300., 0.));
    let stats = diagram.refresh(diagram.tree().root(), &SettingsStyle::default(), 0.);

    assert_eq!(stats.entered, vec![0, 1, 2, 3]);
    assert_eq!(diagram.tree().node_count(), 4);
    assert_eq!(diagram.tree().tree_height(), 2);
}

#[test]
fn goal_branch_is_flagged_and_decodes_against_the_root_table() {
    let mut diagram = loaded_diagram();
    diagram.refresh(diagram.tree().root(), &SettingsStyle::default(), 0.);

    let tree = diagram.tree();
    let children = tree.children(tree.root());
    let goal = children[0];
    assert_eq!(tree.node(goal).unwrap().name(), GOAL_NAME);
    assert!(tree.node(goal).unwrap().on_goal_path());
    assert!(!tree.node(tree.root()).unwrap().on_goal_path());
    assert!(!tree.node(children[1]).unwrap().on_goal_path());

    // "3" selects the low two bits of the first digit.
    assert_eq!(tree.describe_state(goal).unwrap(), "holding x\nclear y");
    // Root's packed "c" selects the high two.
    assert_eq!(tree.describe_state(tree.root()).unwrap(), "at a\nat b");
}

#[test]
fn collapse_then_expand_restores_the_same_identities() {
    let mut diagram = loaded_diagram();
    let style = SettingsStyle::default();
    let root = diagram.tree().root();
    diagram.refresh(root, &style, 0.);

    let branch = diagram.tree().children(root)[1];
    diagram.tree_mut().toggle(branch);
    let collapsed = diagram.refresh(branch, &style, 1.);
    assert_eq!(collapsed.exited, vec![3]);
    assert_eq!(diagram.ghosts().len(), 1);

    diagram.tree_mut().toggle(branch);
    let expanded = diagram.refresh(branch, &style, 2.);
    assert_eq!(expanded.entered, collapsed.exited);
    assert!(expanded.exited.is_empty());
}

#[test]
fn projection_flip_keeps_nodes_and_flags_intact() {
    let mut diagram = loaded_diagram();
    let style = SettingsStyle::default();
    let root = diagram.tree().root();
    diagram.refresh(root, &style, 0.);

    let goal = diagram.tree().children(root)[0];
    diagram.request(RefreshRequest::ToggleMode);
    assert_eq!(diagram.take_request(), Some(RefreshRequest::ToggleMode));
    diagram.flip_mode();
    let stats = diagram.refresh(root, &style, 1.);

    assert_eq!(diagram.mode(), LayoutMode::Radial);
    assert_eq!(stats.updated, vec![0, 1, 2, 3]);
    assert!(stats.entered.is_empty() && stats.exited.is_empty());
    assert!(diagram.tree().node(goal).unwrap().on_goal_path());
}

#[test]
fn deep_collapse_does_not_shrink_the_reported_height() {
    let mut diagram = loaded_diagram();
    let style = SettingsStyle::default();
    let root = diagram.tree().root();
    diagram.refresh(root, &style, 0.);
    assert_eq!(diagram.tree().tree_height(), 2);

    let branch = diagram.tree().children(root)[1];
    diagram.tree_mut().toggle(branch);
    diagram.refresh(branch, &style, 1.);
    assert_eq!(diagram.tree().tree_height(), 2);
}
