use std::{env, fs::read_to_string, path::Path, process::ExitCode};

use elaborator::{
    ast::{ast::DeclKind, statements::Stmt},
    context::context::Context,
    display_error,
    elaborator::elaborate,
    errors::errors::Error,
    init_tracing,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <file>", args.first().map_or("elaborator", String::as_str));
        return ExitCode::from(2);
    }

    let file_path = &args[1];
    let file_name = Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.clone());

    let content = match read_to_string(file_path) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("error: cannot read {}: {}", file_path, error);
            return ExitCode::from(1);
        }
    };

    let report = |errors: &[Error]| {
        for error in errors {
            display_error(error, &file_name, &content);
        }
        ExitCode::from(1)
    };

    let tokens = match tokenize(content.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => return report(&[error]),
    };

    let mut cxt = Context::new();
    let mut unit = match parse(tokens, &mut cxt) {
        Ok(unit) => unit,
        Err(error) => return report(&[error]),
    };

    let errors = elaborate(&mut cxt, &mut unit);
    if !errors.is_empty() {
        return report(&errors);
    }

    print_declarations(&cxt, &unit.body, 0);
    ExitCode::SUCCESS
}

/// Prints each declaration in `body` with its elaborated type, and the value
/// of each constant.
fn print_declarations(cxt: &Context, body: &[Stmt], indent: usize) {
    let padding = "  ".repeat(indent);

    for id in body.iter().filter_map(Stmt::declaration) {
        let decl = cxt.decl(id);
        match &decl.kind {
            DeclKind::Variable(object) => {
                println!("{}var {}: {}", padding, decl.name, object.ty)
            }
            DeclKind::Constant(object) => match cxt.constant(id) {
                Some(value) => println!("{}def {}: {} = {}", padding, decl.name, object.ty, value),
                None => println!("{}def {}: {}", padding, decl.name, object.ty),
            },
            DeclKind::Super(ty) => println!("{}super {}: {}", padding, decl.name, ty),
            DeclKind::Function(function) | DeclKind::Coroutine(function) => {
                let keyword = match decl.kind {
                    DeclKind::Coroutine(_) => "coroutine",
                    _ => "def",
                };
                let generic = if function.is_generic() {
                    let names = function
                        .template_parameters
                        .iter()
                        .map(|parameter| cxt.decl(*parameter).name.clone())
                        .collect::<Vec<_>>();
                    format!("<{}>", names.join(", "))
                } else {
                    String::new()
                };
                println!("{}{} {}{}: {}", padding, keyword, decl.name, generic, function.ty);
            }
            DeclKind::Class(class) | DeclKind::Extension(class) => {
                println!("{}class {}: {}", padding, decl.name, class.kind);
                print_declarations(cxt, &class.body, indent + 1);
            }
            DeclKind::Parameter(_) | DeclKind::TypeParameter => {}
        }
    }
}
