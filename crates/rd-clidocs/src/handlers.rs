//! Per-entity-kind render handlers.
//!
//! Each handler is a registrar installing one bus subscription per entry of
//! a const dispatch table mapping event kind to render function. The tables
//! are built once at registration time and are plainly inspectable; there is
//! no name-based lookup at dispatch.
//!
//! Handlers never call each other. They cooperate only through the section
//! skeleton of the shared document: every entity document is pre-created
//! with [`SECTION_NAMES`], and each render function writes into the section
//! its event belongs to.

use std::rc::Rc;

use rd_document::{DocError, DocumentStructure, RenderTarget, StructureBus};

use crate::error::CliDocError;
use crate::event::{
    DocArgument, DocEvent, DocEventBus, DocEventKind, EntityKind, SharedDoc, Subject, shared_doc,
};
use crate::model::{ParamKind, Parameter};

/// Standard section skeleton of an entity document, in render order.
pub const SECTION_NAMES: &[&str] = &["title", "description", "synopsis", "options", "subitems"];

type RenderFn = fn(&DocEvent, &mut DocumentStructure) -> Result<(), DocError>;

/// Create a document pre-populated with the standard section skeleton.
pub fn entity_document(
    name: &str,
    bus: StructureBus,
    target: RenderTarget,
) -> Result<SharedDoc, CliDocError> {
    let mut doc = DocumentStructure::new(name, bus).with_target(target);
    doc.add_sections(SECTION_NAMES)?;
    Ok(shared_doc(doc))
}

/// Register the provider, service and operation handlers on one bus.
pub fn register_all(bus: &mut DocEventBus) {
    ProviderDocHandler::register(bus);
    ServiceDocHandler::register(bus);
    OperationDocHandler::register(bus);
}

fn install(bus: &mut DocEventBus, kind: EntityKind, dispatch: &'static [(DocEventKind, RenderFn)]) {
    for &(event_kind, render) in dispatch {
        bus.register(event_kind.pattern(kind), move |_topic, event: &mut DocEvent| {
            let doc = Rc::clone(&event.doc);
            let mut doc = doc.borrow_mut();
            render(event, &mut doc).map_err(Into::into)
        });
    }
}

/// Renders provider documents: description, synopsis, global options and the
/// service table.
pub struct ProviderDocHandler;

impl ProviderDocHandler {
    const DISPATCH: &'static [(DocEventKind, RenderFn)] = &[
        (DocEventKind::Title, provider_title),
        (DocEventKind::Description, provider_description),
        (DocEventKind::SynopsisStart, provider_synopsis),
        (DocEventKind::OptionsStart, provider_options_start),
        (DocEventKind::Option, provider_option),
        (DocEventKind::SubitemsStart, provider_subitems_start),
        (DocEventKind::Subitem, provider_subitem),
    ];

    /// Subscribe this handler's dispatch table to `doc-*.Provider.*` events.
    pub fn register(bus: &mut DocEventBus) {
        install(bus, EntityKind::Provider, Self::DISPATCH);
    }
}

fn provider_title(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Subject::Provider(provider) = &event.subject else {
        return Ok(());
    };
    doc.get_section_mut("title")?.writer().h1(&provider.name);
    Ok(())
}

fn provider_description(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Subject::Provider(provider) = &event.subject else {
        return Ok(());
    };
    let section = doc.get_section_mut("description")?;
    section.writer().h2("Description");
    section.include_doc_string(&provider.description);
    Ok(())
}

fn provider_synopsis(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Subject::Provider(provider) = &event.subject else {
        return Ok(());
    };
    let section = doc.get_section_mut("synopsis")?;
    {
        let mut writer = section.writer();
        writer.h2("Synopsis");
        writer.codeblock(&provider.synopsis);
    }
    section.include_doc_string(&provider.help_usage);
    section.writer().new_paragraph();
    Ok(())
}

fn provider_options_start(_event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    doc.get_section_mut("options")?.writer().h2("Options");
    Ok(())
}

fn provider_option(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Some(DocArgument::GlobalOption(option)) = &event.argument else {
        return Ok(());
    };
    let section = doc
        .get_section_mut("options")?
        .add_new_section(option.topic_segment())?;

    let usage = match &option.metavar {
        Some(metavar) => format!("{} <{metavar}>", option.name),
        None => option.name.clone(),
    };
    section.writer().code(&usage);
    if !option.help.is_empty() {
        section.include_doc_string(&option.help);
    }
    section.writer().new_paragraph();

    if !option.choices.is_empty() {
        let mut choices = option.choices.clone();
        choices.sort();
        let mut writer = section.writer();
        writer.start_ul();
        for choice in &choices {
            writer.li(choice);
        }
        writer.end_ul();
    }
    Ok(())
}

fn provider_subitems_start(_event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let mut writer = doc.get_section_mut("subitems")?.writer();
    writer.h2("Available Services");
    writer.toctree();
    Ok(())
}

fn provider_subitem(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Some(DocArgument::Service(service)) = &event.argument else {
        return Ok(());
    };
    let reference = format!("{}/index", service.endpoint_prefix);
    doc.get_section_mut("subitems")?
        .writer()
        .tocitem(&service.full_name, Some(&reference));
    Ok(())
}

/// Renders service documents: description plus the operation table.
pub struct ServiceDocHandler;

impl ServiceDocHandler {
    const DISPATCH: &'static [(DocEventKind, RenderFn)] = &[
        (DocEventKind::Title, service_title),
        (DocEventKind::Description, service_description),
        (DocEventKind::SubitemsStart, service_subitems_start),
        (DocEventKind::Subitem, service_subitem),
    ];

    /// Subscribe this handler's dispatch table to `doc-*.Service.*` events.
    pub fn register(bus: &mut DocEventBus) {
        install(bus, EntityKind::Service, Self::DISPATCH);
    }
}

fn service_title(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Subject::Service(service) = &event.subject else {
        return Ok(());
    };
    doc.get_section_mut("title")?
        .writer()
        .h1(&service.endpoint_prefix);
    Ok(())
}

fn service_description(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Subject::Service(service) = &event.subject else {
        return Ok(());
    };
    let section = doc.get_section_mut("description")?;
    section.writer().h2("Description");
    section.include_doc_string(&service.documentation);
    Ok(())
}

fn service_subitems_start(_event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let mut writer = doc.get_section_mut("subitems")?.writer();
    writer.h2("Available Commands");
    writer.toctree();
    Ok(())
}

fn service_subitem(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Some(DocArgument::Operation(operation)) = &event.argument else {
        return Ok(());
    };
    doc.get_section_mut("subitems")?
        .writer()
        .tocitem(&operation.cli_name, None);
    Ok(())
}

/// Renders operation documents: description, synopsis and one entry per
/// parameter, including aggregate-parameter syntax examples.
pub struct OperationDocHandler;

impl OperationDocHandler {
    const DISPATCH: &'static [(DocEventKind, RenderFn)] = &[
        (DocEventKind::Title, operation_title),
        (DocEventKind::Description, operation_description),
        (DocEventKind::SynopsisStart, operation_synopsis_start),
        (DocEventKind::SynopsisOption, operation_synopsis_option),
        (DocEventKind::OptionsStart, operation_options_start),
        (DocEventKind::Option, operation_option),
        (DocEventKind::OptionExample, operation_option_example),
    ];

    /// Subscribe this handler's dispatch table to `doc-*.Operation.*` events.
    pub fn register(bus: &mut DocEventBus) {
        install(bus, EntityKind::Operation, Self::DISPATCH);
    }
}

fn operation_title(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Subject::Operation(operation) = &event.subject else {
        return Ok(());
    };
    doc.get_section_mut("title")?
        .writer()
        .h1(&operation.cli_name);
    Ok(())
}

fn operation_description(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Subject::Operation(operation) = &event.subject else {
        return Ok(());
    };
    let section = doc.get_section_mut("description")?;
    section.writer().h2("Description");
    section.include_doc_string(&operation.documentation);
    Ok(())
}

fn operation_synopsis_start(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Subject::Operation(operation) = &event.subject else {
        return Ok(());
    };
    let mut writer = doc.get_section_mut("synopsis")?.writer();
    writer.h2("Synopsis");
    writer.write("::\n\n");
    writer.writeln(&format!("  {}", operation.cli_name));
    Ok(())
}

fn operation_synopsis_option(
    event: &DocEvent,
    doc: &mut DocumentStructure,
) -> Result<(), DocError> {
    let Some(DocArgument::Parameter(param)) = &event.argument else {
        return Ok(());
    };
    let mut option_str = param.cli_name.clone();
    if !param.kind.is_boolean() {
        option_str.push_str(" <value>");
    }
    if !param.required {
        option_str = format!("[{option_str}]");
    }
    doc.get_section_mut("synopsis")?
        .writer()
        .writeln(&format!("    {option_str}"));
    Ok(())
}

fn operation_options_start(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Subject::Operation(operation) = &event.subject else {
        return Ok(());
    };
    let mut writer = doc.get_section_mut("options")?.writer();
    writer.h2("Options");
    if operation.params.is_empty() {
        writer.write("*None*\n");
    }
    Ok(())
}

fn operation_option(event: &DocEvent, doc: &mut DocumentStructure) -> Result<(), DocError> {
    let Some(DocArgument::Parameter(param)) = &event.argument else {
        return Ok(());
    };
    let section = doc
        .get_section_mut("options")?
        .add_new_section(param.topic_segment())?;
    {
        let mut writer = section.writer();
        writer.write(format!(
            "``{}`` ({})\n",
            param.cli_name,
            param.kind.type_display()
        ));
        writer.indent();
    }
    section.include_doc_string(&param.documentation);
    let mut writer = section.writer();
    writer.dedent();
    writer.new_paragraph();
    Ok(())
}

fn operation_option_example(
    event: &DocEvent,
    doc: &mut DocumentStructure,
) -> Result<(), DocError> {
    let Some(DocArgument::Parameter(param)) = &event.argument else {
        return Ok(());
    };
    if param.kind.is_scalar() {
        return Ok(());
    }
    let section = doc
        .get_section_mut("options")?
        .get_section_mut(param.topic_segment())?;
    let skeleton = syntax_skeleton(param);
    let mut writer = section.writer();
    writer.new_paragraph();
    writer.italics("JSON Parameter Syntax");
    writer.codeblock(&skeleton);
    Ok(())
}

/// Render the value-shape skeleton shown under aggregate parameters.
fn syntax_skeleton(param: &Parameter) -> String {
    let mut lines = Vec::new();
    push_value(param, 0, &mut lines);
    lines.join("\n")
}

fn scalar_example(param: &Parameter) -> String {
    match &param.kind {
        ParamKind::String if !param.choices.is_empty() => param
            .choices
            .iter()
            .map(|choice| format!("\"{choice}\""))
            .collect::<Vec<_>>()
            .join("|"),
        ParamKind::String => "\"string\"".to_owned(),
        ParamKind::Boolean => "true|false".to_owned(),
        other => other.type_name().to_owned(),
    }
}

fn push_value(param: &Parameter, depth: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(depth);
    match &param.kind {
        ParamKind::List { member } if member.kind.is_scalar() => {
            lines.push(format!("{pad}[{}, ...]", scalar_example(member)));
        }
        ParamKind::List { member } => {
            lines.push(format!("{pad}["));
            push_value(member, depth + 1, lines);
            lines.push(format!("{pad}  ..."));
            lines.push(format!("{pad}]"));
        }
        ParamKind::Map { key, value } => {
            lines.push(format!("{pad}{{"));
            if value.kind.is_scalar() {
                lines.push(format!(
                    "{pad}  {}: {}",
                    scalar_example(key),
                    scalar_example(value)
                ));
            } else {
                lines.push(format!("{pad}  {}:", scalar_example(key)));
                push_value(value, depth + 2, lines);
            }
            lines.push(format!("{pad}  ..."));
            lines.push(format!("{pad}}}"));
        }
        ParamKind::Structure { members } => {
            lines.push(format!("{pad}{{"));
            for (index, member) in members.iter().enumerate() {
                let comma = if index + 1 < members.len() { "," } else { "" };
                if member.kind.is_scalar() {
                    lines.push(format!(
                        "{pad}  \"{}\": {}{comma}",
                        member.name,
                        scalar_example(member)
                    ));
                } else {
                    lines.push(format!("{pad}  \"{}\":", member.name));
                    push_value(member, depth + 2, lines);
                }
            }
            lines.push(format!("{pad}}}"));
        }
        _ => lines.push(format!("{pad}{}", scalar_example(param))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rd_document::structure_bus;
    use rd_events::EventBus;

    use crate::driver::{document_operation, document_provider, document_service};
    use crate::model::{GlobalOption, Operation, Provider, Service};

    use super::*;

    fn sample_operation() -> (Rc<Service>, Rc<Operation>) {
        let operation = Rc::new(Operation {
            name: "DescribeTags".to_owned(),
            cli_name: "describe-tags".to_owned(),
            documentation: "<p>Describes tags for <code>DescribeTags</code>.</p>".to_owned(),
            params: vec![
                Rc::new(Parameter {
                    name: "InstanceId".to_owned(),
                    cli_name: "--instance-id".to_owned(),
                    kind: ParamKind::String,
                    required: true,
                    documentation: "<p>The instance.</p>".to_owned(),
                    choices: Vec::new(),
                }),
                Rc::new(Parameter {
                    name: "DryRun".to_owned(),
                    cli_name: "--dry-run".to_owned(),
                    kind: ParamKind::Boolean,
                    ..Parameter::default()
                }),
                Rc::new(Parameter {
                    name: "Filters".to_owned(),
                    cli_name: "--filters".to_owned(),
                    kind: ParamKind::List {
                        member: Box::new(Parameter {
                            name: "Filter".to_owned(),
                            kind: ParamKind::Structure {
                                members: vec![
                                    Parameter {
                                        name: "Name".to_owned(),
                                        kind: ParamKind::String,
                                        ..Parameter::default()
                                    },
                                    Parameter {
                                        name: "Values".to_owned(),
                                        kind: ParamKind::List {
                                            member: Box::new(Parameter::default()),
                                        },
                                        ..Parameter::default()
                                    },
                                ],
                            },
                            ..Parameter::default()
                        }),
                    },
                    ..Parameter::default()
                }),
            ],
        });
        let service = Rc::new(Service {
            endpoint_prefix: "ec2".to_owned(),
            full_name: "Amazon Elastic Compute Cloud".to_owned(),
            documentation: "<p>Elastic compute.</p>".to_owned(),
            operations: vec![Rc::clone(&operation)],
        });
        (service, operation)
    }

    #[test]
    fn test_operation_document_renders_all_sections() {
        let mut bus = EventBus::new();
        register_all(&mut bus);
        let (service, operation) = sample_operation();
        let doc = entity_document("describe-tags", structure_bus(), RenderTarget::Man).unwrap();

        document_operation(&mut bus, &service, &operation, &doc).unwrap();
        let rendered = doc.borrow_mut().flush_structure().unwrap();

        // Title
        assert!(rendered.contains("*************\ndescribe-tags\n*************"));
        // Description, with the wire name translated to the CLI name
        assert!(rendered.contains("========\nSynopsis\n========"));
        assert!(rendered.contains("Describes tags for ``describe-tags``"));
        // Synopsis block with one line per parameter
        assert!(rendered.contains("::\n\n  describe-tags\n"));
        assert!(!rendered.contains("    [--instance-id <value>]\n"));
        assert!(rendered.contains("    --instance-id <value>\n"));
        assert!(rendered.contains("    [--dry-run]\n"));
        assert!(rendered.contains("    [--filters <value>]\n"));
        // Options entries with type labels
        assert!(rendered.contains("``--instance-id`` (string)\n"));
        assert!(rendered.contains("``--dry-run`` (boolean)\n"));
        assert!(rendered.contains("``--filters`` (list)\n"));
        // Aggregate parameter syntax example
        assert!(rendered.contains("*JSON Parameter Syntax* ::"));
        assert!(rendered.contains("\"Name\": \"string\","));
        assert!(rendered.contains("[\"string\", ...]"));
    }

    #[test]
    fn test_operation_without_params_renders_none() {
        let mut bus = EventBus::new();
        register_all(&mut bus);
        let operation = Rc::new(Operation {
            name: "ListThings".to_owned(),
            cli_name: "list-things".to_owned(),
            ..Operation::default()
        });
        let service = Rc::new(Service {
            endpoint_prefix: "things".to_owned(),
            operations: vec![Rc::clone(&operation)],
            ..Service::default()
        });
        let doc = entity_document("list-things", structure_bus(), RenderTarget::Man).unwrap();

        document_operation(&mut bus, &service, &operation, &doc).unwrap();
        let rendered = doc.borrow_mut().flush_structure().unwrap();
        assert!(rendered.contains("=======\nOptions\n======="));
        assert!(rendered.contains("*None*\n"));
    }

    #[test]
    fn test_option_sections_follow_event_order() {
        let mut bus = EventBus::new();
        register_all(&mut bus);
        let (service, operation) = sample_operation();
        let doc = entity_document("describe-tags", structure_bus(), RenderTarget::Man).unwrap();

        document_operation(&mut bus, &service, &operation, &doc).unwrap();

        let doc = doc.borrow();
        let options = doc.get_section("options").unwrap();
        let names: Vec<_> = options.sections().map(|s| s.name().to_owned()).collect();
        assert_eq!(names, ["instance-id", "dry-run", "filters"]);
    }

    #[test]
    fn test_service_document_man_toc() {
        let mut bus = EventBus::new();
        register_all(&mut bus);
        let (service, _operation) = sample_operation();
        let doc = entity_document("ec2", structure_bus(), RenderTarget::Man).unwrap();

        document_service(&mut bus, &service, &doc).unwrap();
        let rendered = doc.borrow_mut().flush_structure().unwrap();

        assert!(rendered.contains("***\nec2\n***"));
        assert!(rendered.contains("Elastic compute."));
        assert!(rendered.contains("==================\nAvailable Commands\n=================="));
        assert!(rendered.contains("* describe-tags\n"));
        assert!(!rendered.contains(".. toctree::"));
    }

    #[test]
    fn test_service_document_html_toc() {
        let mut bus = EventBus::new();
        register_all(&mut bus);
        let (service, _operation) = sample_operation();
        let doc = entity_document("ec2", structure_bus(), RenderTarget::Html).unwrap();

        document_service(&mut bus, &service, &doc).unwrap();
        let rendered = doc.borrow_mut().flush_structure().unwrap();

        assert!(rendered.contains(".. toctree::\n  :maxdepth: 1\n  :titlesonly:\n\n"));
        assert!(rendered.contains("\n  describe-tags\n"));
    }

    #[test]
    fn test_provider_document() {
        let mut bus = EventBus::new();
        register_all(&mut bus);
        let (service, _operation) = sample_operation();
        let provider = Rc::new(Provider {
            name: "aws".to_owned(),
            description: "<p>Unified tool for services.</p>".to_owned(),
            synopsis: "aws [options] <command> <subcommand>".to_owned(),
            help_usage: "<p>Use <code>aws help</code> for details.</p>".to_owned(),
            options: vec![Rc::new(GlobalOption {
                name: "--output".to_owned(),
                metavar: Some("format".to_owned()),
                help: "<p>Output format.</p>".to_owned(),
                choices: vec!["text".to_owned(), "json".to_owned()],
            })],
            services: vec![service],
        });
        let doc = entity_document("aws", structure_bus(), RenderTarget::Html).unwrap();

        document_provider(&mut bus, &provider, &doc).unwrap();
        let rendered = doc.borrow_mut().flush_structure().unwrap();

        assert!(rendered.contains("***\naws\n***"));
        assert!(rendered.contains("Unified tool for services."));
        assert!(rendered.contains("::\n\n  aws [options] <command> <subcommand>\n"));
        assert!(rendered.contains("``--output <format>``"));
        // Choices are sorted
        let json = rendered.find("* json").unwrap();
        let text = rendered.find("* text").unwrap();
        assert!(json < text);
        // Service subitem references the service index page
        assert!(rendered.contains("\n  ec2/index\n"));
    }

    #[test]
    fn test_dispatch_tables_cover_expected_kinds() {
        let kinds: Vec<_> = OperationDocHandler::DISPATCH
            .iter()
            .map(|(kind, _)| *kind)
            .collect();
        assert_eq!(
            kinds,
            [
                DocEventKind::Title,
                DocEventKind::Description,
                DocEventKind::SynopsisStart,
                DocEventKind::SynopsisOption,
                DocEventKind::OptionsStart,
                DocEventKind::Option,
                DocEventKind::OptionExample,
            ]
        );
    }

    #[test]
    fn test_syntax_skeleton_for_map() {
        let param = Parameter {
            kind: ParamKind::Map {
                key: Box::new(Parameter {
                    kind: ParamKind::String,
                    ..Parameter::default()
                }),
                value: Box::new(Parameter {
                    kind: ParamKind::Integer,
                    ..Parameter::default()
                }),
            },
            ..Parameter::default()
        };
        assert_eq!(
            syntax_skeleton(&param),
            "{\n  \"string\": integer\n  ...\n}"
        );
    }

    #[test]
    fn test_syntax_skeleton_for_enum_choices() {
        let param = Parameter {
            kind: ParamKind::List {
                member: Box::new(Parameter {
                    kind: ParamKind::String,
                    choices: vec!["on".to_owned(), "off".to_owned()],
                    ..Parameter::default()
                }),
            },
            ..Parameter::default()
        };
        assert_eq!(syntax_skeleton(&param), "[\"on\"|\"off\", ...]");
    }
}
