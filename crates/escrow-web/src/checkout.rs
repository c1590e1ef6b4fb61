//! Checkout Form Bootstrap
//!
//! Binds the server-rendered payment form to a [`CheckoutController`]:
//! amount `input` → breakdown, card `change` → inline error, form `submit` →
//! payment attempt. Listeners live as long as the page.

use std::rc::Rc;

use escrow_checkout::{
    ApiConfig, CardElementOptions, CheckoutController, CheckoutError, HttpPaymentApi, PageConfig,
    Result,
};
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlInputElement, Window};

use crate::dom::{
    self, AMOUNT_ID, BrowserNavigator, CARD_MOUNT_SELECTOR, DomCheckoutView, PAYMENT_FORM_ID,
};
use crate::stripe::StripeCard;

type PageController = CheckoutController<HttpPaymentApi, StripeCard, DomCheckoutView, BrowserNavigator>;

/// Backend client rooted at the page origin
pub fn api_client(window: &Window) -> HttpPaymentApi {
    let origin = window.location().origin().unwrap_or_default();
    HttpPaymentApi::new(ApiConfig::resolve(&origin))
}

/// Wires the checkout form. `Ok(false)` when this page has no checkout.
pub fn mount(window: &Window, config: &PageConfig) -> Result<bool> {
    let Some(publishable_key) = config.checkout_key() else {
        return Ok(false);
    };
    let document = window
        .document()
        .ok_or_else(|| CheckoutError::Dom("no document".into()))?;
    let Some(form) = document.get_element_by_id(PAYMENT_FORM_ID) else {
        return Ok(false);
    };

    let card = StripeCard::mount(
        publishable_key,
        CARD_MOUNT_SELECTOR,
        &CardElementOptions::default(),
    )?;
    let view = DomCheckoutView::bind(&document)?;
    let amount_input: HtmlInputElement = dom::typed(&document, AMOUNT_ID)?;
    let label = view.submit_label();

    let controller: Rc<PageController> = Rc::new(
        CheckoutController::new(
            config,
            api_client(window),
            card,
            view,
            BrowserNavigator::new(window.clone()),
        )
        .with_submit_label(label),
    );

    {
        let controller = Rc::clone(&controller);
        let input = amount_input.clone();
        listen(&amount_input, "input", move |_| {
            controller.amount_changed(&input.value());
        })?;
    }

    {
        let controller_ref = Rc::clone(&controller);
        controller.processor().on_change(move |error| {
            controller_ref.card_changed(error.as_deref());
        });
    }

    {
        let controller = Rc::clone(&controller);
        let input = amount_input.clone();
        listen(&form, "submit", move |event| {
            event.prevent_default();

            let controller = Rc::clone(&controller);
            let amount = input.value();
            let seller_id = dom::seller_id(&document);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = controller.submit(&amount, seller_id).await;
                tracing::debug!(?outcome, "Submit finished");
            });
        })?;
    }

    controller.start(&amount_input.value());
    Ok(true)
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<()> {
    let listener = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
        .map_err(|err| CheckoutError::Dom(format!("cannot listen for {event}: {err:?}")))?;
    listener.forget();
    Ok(())
}
