//! Drivers firing the fixed event sequence for each entity kind.
//!
//! A driver walks one entity and emits the ordered document-build events
//! (title → description → synopsis → options → subitems); it writes no
//! markup itself. Handlers registered on the bus do the rendering, so new
//! renderers can be added without touching the walk.

use std::rc::Rc;

use crate::error::CliDocError;
use crate::event::{DocArgument, DocEvent, DocEventBus, DocEventKind, SharedDoc, Subject};
use crate::model::{Operation, Provider, Service};

fn fire(
    bus: &mut DocEventBus,
    kind: DocEventKind,
    subject: &Subject,
    doc: &SharedDoc,
    argument: Option<DocArgument>,
) -> Result<(), CliDocError> {
    let mut event = DocEvent {
        kind,
        subject: subject.clone(),
        doc: Rc::clone(doc),
        argument,
    };
    let topic = event.topic();
    let dispatched = bus.emit(&topic, &mut event)?;
    tracing::trace!(topic = %topic, dispatched, "fired doc event");
    Ok(())
}

/// Document a provider: its description, synopsis, global options and the
/// table of its services.
pub fn document_provider(
    bus: &mut DocEventBus,
    provider: &Rc<Provider>,
    doc: &SharedDoc,
) -> Result<(), CliDocError> {
    let subject = Subject::Provider(Rc::clone(provider));
    fire(bus, DocEventKind::Title, &subject, doc, None)?;
    fire(bus, DocEventKind::Description, &subject, doc, None)?;
    fire(bus, DocEventKind::SynopsisStart, &subject, doc, None)?;
    fire(bus, DocEventKind::SynopsisEnd, &subject, doc, None)?;
    fire(bus, DocEventKind::OptionsStart, &subject, doc, None)?;
    for option in &provider.options {
        let argument = DocArgument::GlobalOption(Rc::clone(option));
        fire(bus, DocEventKind::Option, &subject, doc, Some(argument.clone()))?;
        fire(bus, DocEventKind::OptionExample, &subject, doc, Some(argument))?;
    }
    fire(bus, DocEventKind::OptionsEnd, &subject, doc, None)?;
    fire(bus, DocEventKind::SubitemsStart, &subject, doc, None)?;
    for service in &provider.services {
        let argument = DocArgument::Service(Rc::clone(service));
        fire(bus, DocEventKind::Subitem, &subject, doc, Some(argument))?;
    }
    fire(bus, DocEventKind::SubitemsEnd, &subject, doc, None)
}

/// Document a service: its description and the table of its operations.
pub fn document_service(
    bus: &mut DocEventBus,
    service: &Rc<Service>,
    doc: &SharedDoc,
) -> Result<(), CliDocError> {
    let subject = Subject::Service(Rc::clone(service));
    fire(bus, DocEventKind::Title, &subject, doc, None)?;
    fire(bus, DocEventKind::Description, &subject, doc, None)?;
    fire(bus, DocEventKind::SynopsisStart, &subject, doc, None)?;
    fire(bus, DocEventKind::SynopsisEnd, &subject, doc, None)?;
    fire(bus, DocEventKind::OptionsStart, &subject, doc, None)?;
    fire(bus, DocEventKind::OptionsEnd, &subject, doc, None)?;
    fire(bus, DocEventKind::SubitemsStart, &subject, doc, None)?;
    for operation in &service.operations {
        let argument = DocArgument::Operation(Rc::clone(operation));
        fire(bus, DocEventKind::Subitem, &subject, doc, Some(argument))?;
    }
    fire(bus, DocEventKind::SubitemsEnd, &subject, doc, None)
}

/// Document an operation: description, synopsis, and one entry per parameter.
///
/// Seeds the document's shared translation map first, so wire names inside
/// doc-strings (`InstanceId`, `DescribeTags`) come out as their CLI forms in
/// every section, including ones created later.
pub fn document_operation(
    bus: &mut DocEventBus,
    service: &Rc<Service>,
    operation: &Rc<Operation>,
    doc: &SharedDoc,
) -> Result<(), CliDocError> {
    {
        let doc = doc.borrow();
        let map = doc.translation_map();
        for param in &operation.params {
            map.insert(param.name.clone(), param.cli_name.clone());
        }
        for sibling in &service.operations {
            map.insert(sibling.name.clone(), sibling.cli_name.clone());
        }
    }

    let subject = Subject::Operation(Rc::clone(operation));
    fire(bus, DocEventKind::Title, &subject, doc, None)?;
    fire(bus, DocEventKind::Description, &subject, doc, None)?;
    fire(bus, DocEventKind::SynopsisStart, &subject, doc, None)?;
    for param in &operation.params {
        let argument = DocArgument::Parameter(Rc::clone(param));
        fire(bus, DocEventKind::SynopsisOption, &subject, doc, Some(argument))?;
    }
    fire(bus, DocEventKind::SynopsisEnd, &subject, doc, None)?;
    fire(bus, DocEventKind::OptionsStart, &subject, doc, None)?;
    for param in &operation.params {
        let argument = DocArgument::Parameter(Rc::clone(param));
        fire(bus, DocEventKind::Option, &subject, doc, Some(argument.clone()))?;
        fire(bus, DocEventKind::OptionExample, &subject, doc, Some(argument))?;
    }
    fire(bus, DocEventKind::OptionsEnd, &subject, doc, None)?;
    fire(bus, DocEventKind::Examples, &subject, doc, None)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use rd_document::{DocumentStructure, structure_bus};
    use rd_events::EventBus;

    use crate::event::shared_doc;
    use crate::model::Parameter;

    use super::*;

    fn recording_bus() -> (DocEventBus, Rc<RefCell<Vec<String>>>) {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in DocEventKind::ALL {
            let sink = Rc::clone(&log);
            bus.register(kind.event_name(), move |topic, _event: &mut DocEvent| {
                sink.borrow_mut().push(topic.to_string());
                Ok(())
            });
        }
        (bus, log)
    }

    #[test]
    fn test_operation_event_sequence() {
        let (mut bus, log) = recording_bus();
        let operation = Rc::new(Operation {
            name: "DescribeTags".to_owned(),
            cli_name: "describe-tags".to_owned(),
            documentation: String::new(),
            params: vec![Rc::new(Parameter {
                name: "Filters".to_owned(),
                cli_name: "--filters".to_owned(),
                ..Parameter::default()
            })],
        });
        let service = Rc::new(Service {
            endpoint_prefix: "ec2".to_owned(),
            operations: vec![Rc::clone(&operation)],
            ..Service::default()
        });
        let doc = shared_doc(DocumentStructure::new("describe-tags", structure_bus()));

        document_operation(&mut bus, &service, &operation, &doc).unwrap();

        assert_eq!(
            *log.borrow(),
            [
                "doc-title.Operation.DescribeTags",
                "doc-description.Operation.DescribeTags",
                "doc-synopsis-start.Operation.DescribeTags",
                "doc-synopsis-option.Operation.DescribeTags.filters",
                "doc-synopsis-end.Operation.DescribeTags",
                "doc-options-start.Operation.DescribeTags",
                "doc-option.Operation.DescribeTags.filters",
                "doc-option-example.Operation.DescribeTags.filters",
                "doc-options-end.Operation.DescribeTags",
                "doc-examples.Operation.DescribeTags",
            ]
        );
    }

    #[test]
    fn test_operation_driver_seeds_translation_map() {
        let (mut bus, _log) = recording_bus();
        let operation = Rc::new(Operation {
            name: "DescribeTags".to_owned(),
            cli_name: "describe-tags".to_owned(),
            documentation: String::new(),
            params: vec![Rc::new(Parameter {
                name: "Filters".to_owned(),
                cli_name: "--filters".to_owned(),
                ..Parameter::default()
            })],
        });
        let service = Rc::new(Service {
            endpoint_prefix: "ec2".to_owned(),
            operations: vec![Rc::clone(&operation)],
            ..Service::default()
        });
        let doc = shared_doc(DocumentStructure::new("describe-tags", structure_bus()));

        document_operation(&mut bus, &service, &operation, &doc).unwrap();

        let doc = doc.borrow();
        assert_eq!(doc.translation_map().translate("Filters"), "--filters");
        assert_eq!(doc.translation_map().translate("DescribeTags"), "describe-tags");
    }

    #[test]
    fn test_provider_event_sequence() {
        let (mut bus, log) = recording_bus();
        let provider = Rc::new(Provider {
            name: "aws".to_owned(),
            options: vec![Rc::new(crate::model::GlobalOption {
                name: "--region".to_owned(),
                ..crate::model::GlobalOption::default()
            })],
            services: vec![Rc::new(Service {
                endpoint_prefix: "ec2".to_owned(),
                ..Service::default()
            })],
            ..Provider::default()
        });
        let doc = shared_doc(DocumentStructure::new("aws", structure_bus()));

        document_provider(&mut bus, &provider, &doc).unwrap();

        assert_eq!(
            *log.borrow(),
            [
                "doc-title.Provider.aws",
                "doc-description.Provider.aws",
                "doc-synopsis-start.Provider.aws",
                "doc-synopsis-end.Provider.aws",
                "doc-options-start.Provider.aws",
                "doc-option.Provider.aws.region",
                "doc-option-example.Provider.aws.region",
                "doc-options-end.Provider.aws",
                "doc-subitems-start.Provider.aws",
                "doc-subitem.Provider.aws.ec2",
                "doc-subitems-end.Provider.aws",
            ]
        );
    }
}
