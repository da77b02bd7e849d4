use actix_web::web;

pub mod choices;
pub mod conversations;
pub mod projects;
pub mod wizard;

/// Registers every route on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(projects::create_project)
        .service(projects::get_project)
        .service(wizard::init_wizard)
        .service(wizard::get_wizard_state)
        .service(wizard::navigate)
        .service(wizard::get_effective_questions)
        .service(wizard::get_answers)
        .service(wizard::save_answer)
        .service(wizard::get_all_answers_flat)
        .service(wizard::get_module_progress)
        .service(wizard::get_overall_progress)
        .service(wizard::assemble_prompt)
        .service(wizard::generate_module_content)
        .service(wizard::validate_module)
        .service(conversations::init_conversation)
        .service(conversations::get_conversation)
        .service(conversations::process_response)
        .service(conversations::complete_conversation)
        .service(conversations::apply_suggestion)
        .service(conversations::save_to_section)
        .service(conversations::switch_mode)
        .service(conversations::analyze_text)
        .service(conversations::generate_suggestion)
        .service(choices::start_choices)
        .service(choices::generate_choices)
        .service(choices::generate_more_choices)
        .service(choices::toggle_choice)
        .service(choices::add_free_input)
        .service(choices::set_free_text)
        .service(choices::synthesize);
}
