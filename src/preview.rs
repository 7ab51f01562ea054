use crate::plan::DirectoryPlan;
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Represents a node in the tree (either file or directory).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    is_file: bool,
}
impl TreeNode {
    fn new(name: String, is_file: bool) -> Self {
        Self {
            name,
            children: Vec::new(),
            is_file,
        }
    }
}

/// Build the directory tree from the plan entries, returning the root node.
fn build_tree(plan: &DirectoryPlan, root: &Path) -> Rc<RefCell<TreeNode>> {
    let root_name = root
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());

    let root_node = Rc::new(RefCell::new(TreeNode::new(root_name, false)));

    // plan entries are relative, the root is the empty path
    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root_node));

    for entry in &plan.entries {
        let path = entry.path();
        let parent = path.parent().unwrap_or_else(|| Path::new(""));

        let Some(parent_node) = lookup.get(parent).map(Rc::clone) else {
            log::debug!(
                "parent: {}, not found for path: {}",
                parent.display(),
                path.display()
            );
            continue;
        };

        let child_name = path
            .file_name()
            .map(|os| os.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let child = Rc::new(RefCell::new(TreeNode::new(child_name, entry.is_file())));

        parent_node.borrow_mut().children.push(Rc::clone(&child));

        lookup.insert(path.to_path_buf(), child);
    }

    root_node
}

fn write_tree(out: &mut String, node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool) {
    let node_borrow = node.borrow();

    let connector = if is_last {
        "└── ".yellow()
    } else {
        "├── ".yellow()
    };
    let name = if node_borrow.is_file {
        node_borrow.name.green()
    } else {
        node_borrow.name.blue()
    };
    let _ = writeln!(out, "{}{}{}", prefix.yellow(), connector, name);

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        write_tree(out, child, &child_prefix, i == len - 1);
    }
}

/// Renders the plan as an ASCII tree rooted at `root`.
pub fn render_tree(plan: &DirectoryPlan, root: &Path) -> String {
    let tree_root = build_tree(plan, root);

    let mut out = String::new();
    write_tree(&mut out, &tree_root, "", true);

    out
}

pub fn preview_as_tree(plan: &DirectoryPlan, root: &Path) {
    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    println!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    print!("{}", render_tree(plan, root));
}
