use askama::Template;

use crate::rtml::{Contact, RenderOptions, Request};

pub const RTML_VERSION: &str = "2.3";
pub const FOOTER: &str = "</RTML>";

#[derive(Template)]
#[template(
    ext = "xml",
    escape = "html",
    source = r#"<?xml version="1.0" encoding="UTF-8"?>
<RTML version="{{ version }}">
<Contact><User>{{ contact.user }}</User>
<Email>{{ contact.email }}</Email>
<Organization>{{ contact.organization }}</Organization></Contact>"#
)]
pub struct HeaderTemplate<'a> {
    pub version: &'a str,
    pub contact: &'a Contact,
}

pub struct PictureView<'a> {
    pub count: u32,
    pub description: &'a str,
    pub exposure_time: String,
    pub filter: &'a str,
}

#[derive(Template)]
#[template(
    ext = "xml",
    escape = "html",
    source = r#"<Request bestefforts="True">
<ID>{{ id }}</ID>
<UserName>{{ user }}</UserName>
<Description>{{ description }}</Description>
<Reason>monitor={{ monitor }}</Reason>
<Project>{{ project }}</Project>
<Schedule>
  <AirmassRange><Minimum>1</Minimum><Maximum>{{ airmass_max }}</Maximum></AirmassRange>
  <SkyCondition>Good</SkyCondition>
  <Moon><Distance>20</Distance><Width>6</Width></Moon>
  <Priority>{{ priority }}</Priority>
</Schedule>
<Target count="{{ repeat }}" interval="0" tolerance="0">
  <Name>{{ id }}</Name>
  <Coordinates><RightAscension>{{ ra }}</RightAscension><Declination>{{ dec }}</Declination></Coordinates>
{% for picture in pictures %}  <Picture count="{{ picture.count }}"><Name>{{ id }}</Name><Description>{{ picture.description }}</Description>
    <ExposureTime>{{ picture.exposure_time }}</ExposureTime><Binning>{{ binning }}</Binning><Filter>{{ picture.filter }}</Filter>
  </Picture>
{% endfor %}</Target>
</Request>"#
)]
pub struct RequestTemplate<'a> {
    pub id: &'a str,
    pub user: &'a str,
    pub description: &'a str,
    pub monitor: u32,
    pub project: &'a str,
    pub airmass_max: String,
    pub priority: i32,
    pub repeat: u32,
    pub ra: String,
    pub dec: String,
    pub binning: u32,
    pub pictures: Vec<PictureView<'a>>,
}

impl<'a> RequestTemplate<'a> {
    pub fn new(request: &'a Request, options: &'a RenderOptions) -> Self {
        let fallback = options.default_picture_description.as_deref().unwrap_or("");
        let pictures = request
            .exposures
            .iter()
            .map(|exposure| PictureView {
                count: exposure.count,
                description: exposure.description.as_deref().unwrap_or(fallback),
                exposure_time: options.float(exposure.exposure_time_s),
                filter: &exposure.filter,
            })
            .collect();

        Self {
            id: &request.id,
            user: &request.user,
            description: &request.description,
            monitor: request.constraints.monitor,
            project: &request.project,
            airmass_max: options.float(request.constraints.airmass_max),
            priority: request.constraints.priority,
            repeat: request.constraints.repeat,
            ra: options.float(request.position.ra_deg()),
            dec: options.float(request.position.dec_deg()),
            binning: request.constraints.binning,
            pictures,
        }
    }
}
