use std::fs;
use std::io::Cursor;

use gerp_core::Index;
use tempfile::{tempdir, TempDir};

fn cat_fixture() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "Cat sat.\nCAT ran.\n").unwrap();
    dir
}

#[test]
fn runs_queries_until_quit() {
    let dir = cat_fixture();
    let index = Index::new(dir.path()).unwrap();

    let scratch = tempdir().unwrap();
    let out_path = scratch.path().join("out.txt");
    let input = Cursor::new("cat\n@i cat\n@q\n");
    let code = gerp::run(&index, input, fs::File::create(&out_path).unwrap()).unwrap();
    assert_eq!(code, 0);

    // Sensitive "cat" misses (stored verbatim words are "Cat"/"CAT");
    // insensitive "cat" hits both lines.
    let a = dir.path().join("a.txt");
    let expected = format!(
        "cat Not Found. Try with @insensitive or @i.\n{0}:1: Cat sat.\n{0}:2: CAT ran.\n",
        a.display()
    );
    assert_eq!(fs::read_to_string(&out_path).unwrap(), expected);
}

#[test]
fn end_of_input_counts_as_quit() {
    let dir = cat_fixture();
    let index = Index::new(dir.path()).unwrap();
    let scratch = tempdir().unwrap();
    let out_path = scratch.path().join("out.txt");

    let code = gerp::run(&index, Cursor::new(""), fs::File::create(&out_path).unwrap()).unwrap();
    assert_eq!(code, 0);
    assert_eq!(fs::read_to_string(&out_path).unwrap(), "");
}

#[test]
fn at_f_redirects_results_to_new_file() {
    let dir = cat_fixture();
    let index = Index::new(dir.path()).unwrap();
    let scratch = tempdir().unwrap();
    let first_path = scratch.path().join("first.txt");
    let second_path = scratch.path().join("second.txt");

    let input = format!("Cat\n@f {}\n@insensitive cat\n@quit\n", second_path.display());
    let code = gerp::run(
        &index,
        Cursor::new(input),
        fs::File::create(&first_path).unwrap(),
    )
    .unwrap();
    assert_eq!(code, 0);

    let a = dir.path().join("a.txt");
    assert_eq!(
        fs::read_to_string(&first_path).unwrap(),
        format!("{}:1: Cat sat.\n", a.display())
    );
    assert_eq!(
        fs::read_to_string(&second_path).unwrap(),
        format!("{0}:1: Cat sat.\n{0}:2: CAT ran.\n", a.display())
    );
}

#[test]
fn end_of_input_mid_command_is_fatal() {
    let dir = cat_fixture();
    let index = Index::new(dir.path()).unwrap();
    let scratch = tempdir().unwrap();
    let out_path = scratch.path().join("out.txt");

    let code = gerp::run(
        &index,
        Cursor::new("@i"),
        fs::File::create(&out_path).unwrap(),
    )
    .unwrap();
    assert_eq!(code, 1);
}
