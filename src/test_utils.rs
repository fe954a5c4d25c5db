pub mod test_helpers {
    use crate::core::git::{GitRepository, GitService};
    use git2::{Oid, Repository, RepositoryInitOptions, Signature};
    use std::path::Path;
    use tempfile::TempDir;

    pub fn setup_test_repo() -> (TempDir, GitRepository) {
        setup_test_repo_on("main")
    }

    /// Initializes a repository whose initial branch is `branch`, with one commit.
    pub fn setup_test_repo_on(branch: &str) -> (TempDir, GitRepository) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        init_repo(temp_dir.path(), branch, false);
        let repo = GitRepository::discover_from(temp_dir.path()).expect("Failed to discover repo");
        (temp_dir, repo)
    }

    pub fn setup_test_service() -> (TempDir, GitService) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        init_repo(temp_dir.path(), "main", false);
        let service = GitService::discover_from(temp_dir.path()).expect("Failed to discover repo");
        (temp_dir, service)
    }

    /// Creates a bare repository whose `main` carries one commit, to act as a remote.
    pub fn setup_bare_remote() -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        init_repo(temp_dir.path(), "main", true);
        temp_dir
    }

    fn init_repo(path: &Path, branch: &str, bare: bool) {
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(branch).bare(bare);
        let repo = Repository::init_opts(path, &opts).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open config");
        config
            .set_str("user.name", "Test User")
            .expect("Failed to set git user name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set git user email");

        let sig = signature();
        let tree_id = repo
            .treebuilder(None)
            .and_then(|builder| builder.write())
            .expect("Failed to write tree");
        let tree = repo.find_tree(tree_id).expect("Failed to find tree");
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .expect("Failed to create initial commit");
    }

    fn signature() -> Signature<'static> {
        Signature::now("Test User", "test@example.com").expect("Failed to build signature")
    }

    pub fn create_branch(repo: &GitRepository, name: &str, from: &str) -> Oid {
        let tip = repo.branch_tip(from).expect("Failed to resolve base branch");
        let commit = repo.inner().find_commit(tip).expect("Failed to find commit");
        repo.inner()
            .branch(name, &commit, false)
            .expect("Failed to create branch");
        tip
    }

    /// Adds a commit with `message` on top of `branch` without touching the worktree.
    pub fn commit_on_branch(repo: &GitRepository, branch: &str, message: &str) -> Oid {
        let git = repo.inner();
        let parent_id = repo.branch_tip(branch).expect("Failed to resolve branch");
        let parent = git.find_commit(parent_id).expect("Failed to find parent");
        let tree = parent.tree().expect("Failed to read tree");
        let sig = signature();
        git.commit(
            Some(&format!("refs/heads/{}", branch)),
            &sig,
            &sig,
            message,
            &tree,
            &[&parent],
        )
        .expect("Failed to commit")
    }

    pub fn set_tracking(repo: &GitRepository, branch: &str, remote: &str, merge: &str) {
        let mut config = repo.inner().config().expect("Failed to open config");
        config
            .set_str(&format!("branch.{}.remote", branch), remote)
            .expect("Failed to set remote");
        config
            .set_str(&format!("branch.{}.merge", branch), merge)
            .expect("Failed to set merge");
    }

    pub fn add_remote(repo: &GitRepository, name: &str, url: &str) {
        repo.inner()
            .remote(name, url)
            .expect("Failed to add remote");
    }

    /// Creates `refs/heads/<branch>` in a bare remote, pointing at its `main`.
    pub fn create_remote_branch(remote_dir: &Path, branch: &str) {
        let remote = Repository::open_bare(remote_dir).expect("Failed to open remote");
        let tip = remote
            .refname_to_id("refs/heads/main")
            .expect("Failed to resolve remote main");
        remote
            .reference(&format!("refs/heads/{}", branch), tip, true, "test")
            .expect("Failed to create remote branch");
    }
}
